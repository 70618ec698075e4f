// ==========================================
// Восстановление нарядов из ведомости
// ==========================================
// Ведомость кодирует наряды плоской чередой строк: шапки
// работников, шапки изделий, датированные группы строк работ и
// завершающая строка «Итого». Структурных разделителей нет —
// только маркерные строки.
//
// Явная машина состояний: Scanning -> InGroup -> Scanning.
// Классификация строки и шаг перехода — чистые функции,
// проверяемые на литеральных строках-фикстурах.
// ==========================================

use crate::domain::entities::{OrderGroup, OrderItem, OrderWorker};
use crate::importer::normalize::{normalize_number, parse_day_month};
use crate::importer::raw_table::RawTable;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Единица измерения строки наряда по умолчанию
const DEFAULT_UNIT: &str = "шт.";

/// Сколько первых строк листа просматривается на год в шапке
const BANNER_SCAN_LINES: usize = 10;

static WORKER_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(фио\s+сотрудника|ф\.?\s*и\.?\s*о\b\.?|full\s+name)").unwrap()
});

static PERSONNEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:таб[а-яё]*\.?\s*№?|tab\.?\s*(?:no\.?)?)\s*:?\s*(\d+)").unwrap());

static PRODUCT_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(издели[ея]\s*№|product\s*(?:no\.?|№))").unwrap());

static REPEAT_ANNOTATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(?\s*(повтор\w*|repeat\w*)\s*\)?").unwrap());

static BANNER_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(20\d{2})\s*(?:г\.?(?:\s|$)|год|year)").unwrap());

/// Состояние прохода по ведомости
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// До открытия первой группы / после закрытия
    Scanning,
    /// Накапливаются строки работ одной даты
    InGroup,
}

/// Вид строки ведомости; приоритет совпадает с порядком вариантов
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    WorkerHeader,
    ProductHeader,
    DateGroup,
    Totals,
    Item,
    Other,
}

/// Классификация строки ведомости
///
/// Маркеры проверяются по первой непустой ячейке; всё, что не
/// подошло под маркер и не пусто, считается строкой работ.
pub fn classify_line(cells: &[String]) -> LineKind {
    let first = match first_non_empty(cells) {
        Some(first) => first,
        None => return LineKind::Other,
    };

    if WORKER_HEADER_RE.is_match(first) {
        return LineKind::WorkerHeader;
    }
    if PRODUCT_HEADER_RE.is_match(first) {
        return LineKind::ProductHeader;
    }
    if parse_day_month(first).is_some() {
        return LineKind::DateGroup;
    }
    let lowered = first.to_lowercase();
    if lowered.starts_with("итого") || lowered.starts_with("total") {
        return LineKind::Totals;
    }
    LineKind::Item
}

/// Сканер ведомости нарядов
pub struct OrderScanner {
    state: ScanState,
    /// Год для дат вида «16.06.» без года
    default_year: i32,
    /// Работники ведомости: накапливаются и действуют на все группы
    workers: Vec<OrderWorker>,
    /// Текущий список изделий: замещается каждой шапкой изделий
    products: Vec<String>,
    group: Option<OrderGroup>,
    output: Vec<OrderGroup>,
}

impl OrderScanner {
    pub fn new(default_year: i32) -> Self {
        Self {
            state: ScanState::Scanning,
            default_year,
            workers: Vec::new(),
            products: Vec::new(),
            group: None,
            output: Vec::new(),
        }
    }

    /// Прогнать целую таблицу (включая строку заголовков)
    ///
    /// Год шапки листа, если найден, замещает год по умолчанию.
    pub fn scan_table(table: &RawTable, fallback_year: i32) -> Vec<OrderGroup> {
        let banner_year = detect_banner_year(table);
        let mut scanner = Self::new(banner_year.unwrap_or(fallback_year));
        for line in table.lines_with_header() {
            scanner.step(line);
        }
        scanner.finish()
    }

    /// Один шаг машины по одной строке
    pub fn step(&mut self, cells: &[String]) {
        match classify_line(cells) {
            LineKind::WorkerHeader => self.on_worker_header(cells),
            LineKind::ProductHeader => self.on_product_header(cells),
            LineKind::DateGroup => self.on_date_group(cells),
            LineKind::Totals => self.close_group(),
            LineKind::Item => self.on_item(cells),
            LineKind::Other => {}
        }
    }

    /// Конец входа: незакрытая непустая группа уходит в выход
    pub fn finish(mut self) -> Vec<OrderGroup> {
        self.close_group();
        self.output
    }

    // ===== Переходы =====

    fn on_worker_header(&mut self, cells: &[String]) {
        if let Some(worker) = extract_worker(cells) {
            let duplicate = self
                .workers
                .iter()
                .any(|w| w.full_name == worker.full_name && w.personnel_no == worker.personnel_no);
            if !duplicate {
                self.workers.push(worker);
            }
        }
    }

    fn on_product_header(&mut self, cells: &[String]) {
        // шапка изделий замещает список целиком
        self.products = extract_products(cells);
    }

    fn on_date_group(&mut self, cells: &[String]) {
        let first = match first_non_empty(cells) {
            Some(first) => first,
            None => return,
        };
        let date = match resolve_group_date(first, self.default_year) {
            Some(date) => date,
            None => return,
        };

        self.close_group();
        self.group = Some(OrderGroup {
            date,
            products: self.products.clone(),
            items: Vec::new(),
            workers: self.workers.clone(),
        });
        self.state = ScanState::InGroup;
    }

    fn on_item(&mut self, cells: &[String]) {
        if self.state != ScanState::InGroup {
            return;
        }
        if let (Some(group), Some(item)) = (self.group.as_mut(), parse_item(cells)) {
            group.items.push(item);
        }
    }

    fn close_group(&mut self) {
        if let Some(group) = self.group.take() {
            if !group.items.is_empty() {
                self.output.push(group);
            }
        }
        self.state = ScanState::Scanning;
    }
}

// ===== Чистые разборы строк =====

fn first_non_empty(cells: &[String]) -> Option<&str> {
    cells.iter().map(String::as_str).find(|c| !c.trim().is_empty())
}

/// Работник из шапки «ФИО сотрудника: …»
///
/// Имя — текст после двоеточия, иначе первая следующая непустая
/// ячейка; табельный номер — по маркеру «таб. №» в любой ячейке.
pub fn extract_worker(cells: &[String]) -> Option<OrderWorker> {
    let first_index = cells.iter().position(|c| !c.trim().is_empty())?;
    let first = cells[first_index].trim();

    let mut name = first
        .split_once(':')
        .map(|(_, rest)| strip_personnel_tail(rest))
        .unwrap_or_default();

    if name.is_empty() {
        name = cells[first_index + 1..]
            .iter()
            .map(|c| c.trim())
            .find(|c| !c.is_empty())
            .map(strip_personnel_tail)
            .unwrap_or_default();
    }
    if name.is_empty() {
        return None;
    }

    let joined = cells.join(" ");
    let personnel_no = PERSONNEL_RE
        .captures(&joined)
        .map(|c| c[1].to_string());

    Some(OrderWorker {
        full_name: name,
        personnel_no,
    })
}

/// Имя без хвоста «таб. № NNN» и висячих разделителей
fn strip_personnel_tail(text: &str) -> String {
    let trimmed = text.trim();
    let cut = PERSONNEL_RE
        .find(trimmed)
        .map(|m| &trimmed[..m.start()])
        .unwrap_or(trimmed);
    cut.trim().trim_end_matches([',', ';']).trim_end().to_string()
}

/// Список номеров изделий из шапки «Изделие № 101, 102 (повтор)»
pub fn extract_products(cells: &[String]) -> Vec<String> {
    let first_index = match cells.iter().position(|c| !c.trim().is_empty()) {
        Some(index) => index,
        None => return Vec::new(),
    };
    let first = cells[first_index].trim();

    let mut tail = PRODUCT_HEADER_RE.replace(first, "").into_owned();
    let tail_rest: Vec<String> = cells[first_index + 1..]
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if !tail_rest.is_empty() {
        if !tail.trim().is_empty() {
            tail.push(',');
        }
        tail.push_str(&tail_rest.join(","));
    }

    let cleaned = REPEAT_ANNOTATION_RE.replace_all(&tail, "");
    cleaned
        .split(',')
        .map(|token| {
            token
                .trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '№' || c == ';')
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Дата группы из ячейки «16.06.» / «16.06.25» / «16.06.2025»
fn resolve_group_date(text: &str, default_year: i32) -> Option<NaiveDate> {
    let (day, month, year) = parse_day_month(text)?;
    NaiveDate::from_ymd_opt(year.unwrap_or(default_year), month, day)
}

/// Строка работ: наименование, ед. изм., цена, кол-во, сумма
///
/// Недостающее из цены/количества/суммы достраивается из двух
/// остальных. Строка без единого числа строкой работ не считается.
pub fn parse_item(cells: &[String]) -> Option<OrderItem> {
    let first_index = cells.iter().position(|c| !c.trim().is_empty())?;
    let job_name = cells[first_index].trim().to_string();

    let mut unit: Option<String> = None;
    let mut numbers: Vec<f64> = Vec::new();
    for cell in &cells[first_index + 1..] {
        let value = cell.trim();
        if value.is_empty() {
            continue;
        }
        if is_numeric_token(value) {
            numbers.push(normalize_number(value));
        } else if unit.is_none() {
            unit = Some(value.to_string());
        }
    }

    let (mut unit_price, mut quantity, mut amount) = match numbers.len() {
        0 => return None,
        // одно число — готовая сумма
        1 => (numbers[0], 1.0, numbers[0]),
        2 => (numbers[0], numbers[1], 0.0),
        _ => (numbers[0], numbers[1], numbers[2]),
    };

    if amount == 0.0 {
        amount = unit_price * quantity;
    }
    if quantity == 0.0 && unit_price > 0.0 {
        quantity = amount / unit_price;
    }
    if unit_price == 0.0 && quantity > 0.0 {
        unit_price = amount / quantity;
    }

    if unit_price < 0.0 || quantity < 0.0 || amount < 0.0 {
        return None;
    }

    Some(OrderItem {
        job_name,
        unit: unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        unit_price,
        quantity,
        amount,
    })
}

/// Число с возможными разделителями тысяч и запятой
fn is_numeric_token(value: &str) -> bool {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    !cleaned.is_empty() && cleaned.parse::<f64>().is_ok()
}

/// Год из шапки листа: первая строка с «20NN г.» / «20NN year»
fn detect_banner_year(table: &RawTable) -> Option<i32> {
    for line in table.lines_with_header().take(BANNER_SCAN_LINES) {
        let joined = line.join(" ");
        if let Some(captures) = BANNER_YEAR_RE.captures(&joined) {
            if let Ok(year) = captures[1].parse() {
                return Some(year);
            }
        }
    }
    None
}
