// ==========================================
// Сопоставление колонок по заголовкам
// ==========================================
// Декларативная таблица: семантическое поле -> упорядоченный
// список кандидатов-подстрок. Никаких разбросанных if-цепочек.
// ==========================================

/// Описание одного семантического поля таблицы
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Имя поля (для сообщения об отсутствующих колонках)
    pub field: &'static str,
    /// Кандидаты-подстроки в порядке приоритета
    pub candidates: &'static [&'static str],
    /// Обязательна ли колонка для разбора таблицы
    pub required: bool,
}

/// Индекс колонки по списку кандидатов
///
/// Кандидаты проверяются в заданном порядке; внутри кандидата
/// побеждает первый заголовок, содержащий его как подстроку.
/// Сравнение без учёта регистра.
pub fn resolve_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    for candidate in candidates {
        if let Some(index) = lowered.iter().position(|h| h.contains(candidate)) {
            return Some(index);
        }
    }
    None
}

/// Разрешить набор полей разом
///
/// Возвращает индексы в порядке спецификаций (None для отсутствующих
/// необязательных) либо список имён отсутствующих обязательных полей.
pub fn resolve_columns(
    headers: &[String],
    specs: &[ColumnSpec],
) -> Result<Vec<Option<usize>>, Vec<String>> {
    let mut resolved = Vec::with_capacity(specs.len());
    let mut missing = Vec::new();

    for spec in specs {
        let index = resolve_column(headers, spec.candidates);
        if index.is_none() && spec.required {
            missing.push(spec.field.to_string());
        }
        resolved.push(index);
    }

    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_candidate_priority_wins_over_header_order() {
        let hs = headers(&["Цена за ед.", "Наименование работ"]);
        // первый кандидат «наимен» должен победить, хотя его колонка вторая
        let index = resolve_column(&hs, &["наимен", "цена"]);
        assert_eq!(index, Some(1));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let hs = headers(&["ТАБЕЛЬНЫЙ №"]);
        assert_eq!(resolve_column(&hs, &["табельн"]), Some(0));
    }

    #[test]
    fn test_missing_required_reported_by_field_name() {
        let hs = headers(&["Наименование"]);
        let specs = [
            ColumnSpec {
                field: "name",
                candidates: &["наимен"],
                required: true,
            },
            ColumnSpec {
                field: "price",
                candidates: &["цена", "расцен"],
                required: true,
            },
        ];
        let err = resolve_columns(&hs, &specs).unwrap_err();
        assert_eq!(err, vec!["price".to_string()]);
    }

    #[test]
    fn test_optional_absent_is_none() {
        let hs = headers(&["Наименование"]);
        let specs = [
            ColumnSpec {
                field: "name",
                candidates: &["наимен"],
                required: true,
            },
            ColumnSpec {
                field: "dept",
                candidates: &["подраздел"],
                required: false,
            },
        ];
        let resolved = resolve_columns(&hs, &specs).unwrap();
        assert_eq!(resolved, vec![Some(0), None]);
    }
}
