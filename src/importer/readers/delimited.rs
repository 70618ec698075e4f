// ==========================================
// Чтение текстовых таблиц (csv/txt)
// ==========================================
// Автоопределение разделителя по первой строке.
// Не-UTF-8 вход декодируется как Windows-1251.
// ==========================================

use crate::importer::raw_table::RawTable;
use crate::importer::readers::{row_is_blank, TableReader};
use csv::ReaderBuilder;
use std::path::Path;

/// Кандидаты-разделители в порядке предпочтения при равенстве
const DELIMITER_CANDIDATES: &[u8] = &[b';', b',', b'\t', b'|'];

pub struct DelimitedReader;

impl TableReader for DelimitedReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["csv", "txt"]
    }

    fn read(&self, path: &Path) -> anyhow::Result<Vec<RawTable>> {
        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        let text = decode_lossy(&bytes);
        let delimiter = sniff_delimiter(&text);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true) // строки разной длины допустимы
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                // отдельная битая строка не валит файл
                Err(_) => continue,
            };
            let cells: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();
            if row_is_blank(&cells) {
                continue;
            }
            rows.push(cells);
        }

        if headers.iter().all(|h| h.is_empty()) && rows.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![RawTable::new(headers, rows)])
    }
}

/// UTF-8, при невалидных байтах — Windows-1251
fn decode_lossy(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1251.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Разделитель с наибольшим числом вхождений в первой строке
fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or("");
    DELIMITER_CANDIDATES
        .iter()
        .copied()
        .max_by_key(|d| first_line.matches(*d as char).count())
        .unwrap_or(b';')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::readers::{read_any_tabular, ReadOutcome};

    fn read_tables(path: &Path) -> Vec<RawTable> {
        match read_any_tabular(path).unwrap() {
            ReadOutcome::Tables(tables) => tables,
            ReadOutcome::Unsupported { reason } => panic!("unsupported: {}", reason),
        }
    }

    #[test]
    fn test_semicolon_sniffing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        std::fs::write(&path, "ФИО;Табельный №;Должность\nИванов И.И.;101;слесарь\n").unwrap();

        let tables = read_tables(&path);
        assert_eq!(tables[0].headers.len(), 3);
        assert_eq!(tables[0].rows[0][1], "101");
    }

    #[test]
    fn test_comma_sniffing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        std::fs::write(&path, "name,unit,price\nWelding,pcs,150\n").unwrap();

        let tables = read_tables(&path);
        assert_eq!(tables[0].headers, vec!["name", "unit", "price"]);
    }

    #[test]
    fn test_cp1251_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cp1251.csv");
        // "ФИО;Цена" в кодировке Windows-1251
        let (encoded, _, _) = encoding_rs::WINDOWS_1251.encode("ФИО;Цена\nИванов;150\n");
        std::fs::write(&path, encoded).unwrap();

        let tables = read_tables(&path);
        assert_eq!(tables[0].headers, vec!["ФИО", "Цена"]);
        assert_eq!(tables[0].rows[0][0], "Иванов");
    }

    #[test]
    fn test_blank_rows_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gaps.csv");
        std::fs::write(&path, "a;b\n1;2\n;\n3;4\n").unwrap();

        let tables = read_tables(&path);
        assert_eq!(tables[0].rows.len(), 2);
    }
}
