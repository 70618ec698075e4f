// ==========================================
// Сырая таблица
// ==========================================
// Упорядоченные заголовки + упорядоченные строки.
// Живёт только внутри одного вызова импорта.
// ==========================================

/// Сырая таблица из внешнего файла
///
/// Все ячейки уже приведены к обрезанным строкам; пустая ячейка — "".
/// Заголовки — то, что заявляет сам файл, без нормализации.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Таблица без единой непустой строки
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ячейка по индексу строки и колонки ("" вне диапазона)
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Все строки, включая строку заголовков первой
    ///
    /// Для ведомостей нарядов маркерные строки могут оказаться
    /// в позиции заголовка, поэтому сканер обходит и её.
    pub fn lines_with_header(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.headers.as_slice()).chain(self.rows.iter().map(|r| r.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_out_of_range_is_empty() {
        let table = RawTable::new(
            vec!["a".to_string()],
            vec![vec!["1".to_string()]],
        );
        assert_eq!(table.cell(0, 0), "1");
        assert_eq!(table.cell(0, 5), "");
        assert_eq!(table.cell(9, 0), "");
    }

    #[test]
    fn test_lines_with_header_starts_with_header() {
        let table = RawTable::new(
            vec!["h".to_string()],
            vec![vec!["r".to_string()]],
        );
        let lines: Vec<_> = table.lines_with_header().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0], "h");
        assert_eq!(lines[1][0], "r");
    }
}
