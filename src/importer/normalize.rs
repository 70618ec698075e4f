// ==========================================
// Нормализация чисел, дат и текста
// ==========================================
// Чистые функции: локальные текстовые формы -> канонические значения.
// Ошибок не возбуждают: непригодный вход -> 0.0 / None.
// ==========================================

use chrono::NaiveDate;

/// Опорная дата серийных номеров Excel
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Допустимый диапазон серийного номера Excel
const EXCEL_SERIAL_MIN: i64 = 1;
const EXCEL_SERIAL_MAX: i64 = 80_000;

/// Основы названий месяцев: проверяются как префиксы токена.
/// Русские основы идут раньше английских; «мар» обязан стоять
/// раньше «ма», иначе март распознается как май.
const MONTH_STEMS: &[(&str, u32)] = &[
    ("янв", 1),
    ("фев", 2),
    ("мар", 3),
    ("апр", 4),
    ("ма", 5),
    ("июн", 6),
    ("июл", 7),
    ("авг", 8),
    ("сен", 9),
    ("окт", 10),
    ("ноя", 11),
    ("дек", 12),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Число из текстовой формы с разделителями
///
/// Убирает пробельные разделители тысяч (включая NBSP), запятую
/// приводит к точке. Непригодный вход даёт 0.0.
pub fn normalize_number(value: &str) -> f64 {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\u{202f}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Дата из любой из поддерживаемых текстовых форм
///
/// Порядок попыток:
/// 1. серийный номер Excel (только цифры, диапазон [1, 80000]);
/// 2. dd.mm.yyyy / dd.mm.yy (двузначный год -> 2000+);
/// 3. yyyy-mm-dd как есть;
/// 4. "<день> <месяц словом> <год>" по таблице основ месяцев.
pub fn normalize_date(value: &str) -> Option<NaiveDate> {
    let text = value.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = parse_excel_serial(text) {
        return Some(date);
    }

    if let Some((day, month, year)) = parse_day_month(text) {
        if let Some(year) = year {
            return NaiveDate::from_ymd_opt(year, month, day);
        }
        // форма dd.mm. без года здесь не дата: год известен только сканеру
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }

    parse_verbal_date(text)
}

/// Серийный номер Excel: только цифры, считая от 1899-12-30
fn parse_excel_serial(text: &str) -> Option<NaiveDate> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let serial: i64 = text.parse().ok()?;
    if !(EXCEL_SERIAL_MIN..=EXCEL_SERIAL_MAX).contains(&serial) {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_days(chrono::Days::new(serial as u64))
}

/// Разбор форм dd.mm. / dd.mm.yy / dd.mm.yyyy
///
/// Возвращает (день, месяц, год?); год None для усечённой формы
/// "16.06." — его подставляет вызывающая сторона (год шапки листа).
pub fn parse_day_month(text: &str) -> Option<(u32, u32, Option<i32>)> {
    let mut parts = text.trim().split('.');
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let year_part = parts.next().map(str::trim);
    // больше трёх сегментов — это не дата
    if parts.next().is_some() {
        return None;
    }
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return None;
    }

    let year = match year_part {
        None | Some("") => None,
        Some(token) => {
            if !token.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            match token.len() {
                2 => Some(2000 + token.parse::<i32>().ok()?),
                4 => Some(token.parse::<i32>().ok()?),
                _ => return None,
            }
        }
    };
    Some((day, month, year))
}

/// Форма "<день> <месяц словом> <год>": "16 июня 2025", "1 мая 25 г."
fn parse_verbal_date(text: &str) -> Option<NaiveDate> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.len() < 3 {
        return None;
    }

    let day: u32 = tokens[0].trim_matches(|c: char| !c.is_ascii_digit()).parse().ok()?;
    let month = month_from_stem(tokens[1])?;
    let year_token: String = tokens[2].chars().filter(|c| c.is_ascii_digit()).collect();
    let year: i32 = match year_token.len() {
        2 => 2000 + year_token.parse::<i32>().ok()?,
        4 => year_token.parse().ok()?,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Номер месяца по префиксу словесной формы
pub fn month_from_stem(token: &str) -> Option<u32> {
    let lowered = token.to_lowercase();
    MONTH_STEMS
        .iter()
        .find(|(stem, _)| lowered.starts_with(stem))
        .map(|(_, month)| *month)
}

/// Текст для сравнения естественных ключей
///
/// Обрезка + приведение регистра; пустое значение схлопывается в None.
pub fn normalize_for_search(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
