// ==========================================
// Чтение электронных таблиц (xlsx/xls/ods)
// ==========================================
// Движок calamine, автоопределение контейнера.
// Одна сырая таблица на лист книги.
// ==========================================

use crate::importer::raw_table::RawTable;
use crate::importer::readers::{row_is_blank, TableReader};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

pub struct SpreadsheetReader;

impl TableReader for SpreadsheetReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["xlsx", "xls", "ods"]
    }

    fn read(&self, path: &Path) -> anyhow::Result<Vec<RawTable>> {
        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names().to_owned();

        let mut tables = Vec::new();
        for sheet_name in sheet_names {
            let range = match workbook.worksheet_range(&sheet_name) {
                Ok(range) => range,
                // битый лист не валит остальные
                Err(_) => continue,
            };

            let mut rows_iter = range.rows();
            let headers: Vec<String> = match rows_iter.next() {
                Some(row) => row.iter().map(cell_to_string).collect(),
                None => continue,
            };

            let mut rows = Vec::new();
            for row in rows_iter {
                let cells: Vec<String> = row.iter().map(cell_to_string).collect();
                if row_is_blank(&cells) {
                    continue;
                }
                rows.push(cells);
            }

            tables.push(RawTable::new(headers, rows));
        }

        Ok(tables)
    }
}

/// Ячейка calamine -> обрезанная строка
///
/// Целые значения с плавающей точкой выводятся без дробной части,
/// чтобы серийные даты Excel оставались распознаваемыми.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_to_string(*f),
        Data::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Data::DateTime(dt) => float_to_string(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(_) => String::new(),
    }
}

fn float_to_string(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::readers::{read_any_tabular, ReadOutcome};

    #[test]
    fn test_cell_float_formatting() {
        assert_eq!(float_to_string(45000.0), "45000");
        assert_eq!(float_to_string(150.5), "150.5");
    }

    #[test]
    fn test_reads_generated_workbook() {
        use rust_xlsxwriter::Workbook;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write(0, 0, "Наименование работ").unwrap();
        sheet.write(0, 1, "Ед. изм.").unwrap();
        sheet.write(0, 2, "Цена").unwrap();
        sheet.write(1, 0, "Сварка").unwrap();
        sheet.write(1, 1, "шт.").unwrap();
        sheet.write(1, 2, 150.0).unwrap();
        workbook.save(&path).unwrap();

        let outcome = read_any_tabular(&path).unwrap();
        let tables = match outcome {
            ReadOutcome::Tables(tables) => tables,
            ReadOutcome::Unsupported { reason } => panic!("xlsx unsupported: {}", reason),
        };
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers[0], "Наименование работ");
        assert_eq!(tables[0].rows[0], vec!["Сварка", "шт.", "150"]);
    }
}
