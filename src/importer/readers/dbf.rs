// ==========================================
// Чтение DBF-выгрузок
// ==========================================
// Одна сырая таблица из всех записей файла.
// ==========================================

use crate::importer::raw_table::RawTable;
use crate::importer::readers::TableReader;
use dbase::FieldValue;
use std::path::Path;

pub struct DbfReader;

impl TableReader for DbfReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["dbf"]
    }

    fn read(&self, path: &Path) -> anyhow::Result<Vec<RawTable>> {
        let mut reader = dbase::Reader::from_path(path)?;

        let headers: Vec<String> = reader
            .fields()
            .iter()
            .map(|f| f.name().trim().to_string())
            .collect();
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        for record in reader.read()? {
            let cells: Vec<String> = headers
                .iter()
                .map(|name| {
                    record
                        .get(name.as_str())
                        .map(field_to_string)
                        .unwrap_or_default()
                })
                .collect();
            if cells.iter().all(|c| c.is_empty()) {
                continue;
            }
            rows.push(cells);
        }

        Ok(vec![RawTable::new(headers, rows)])
    }
}

fn field_to_string(value: &FieldValue) -> String {
    match value {
        FieldValue::Character(Some(s)) => s.trim().to_string(),
        FieldValue::Character(None) => String::new(),
        FieldValue::Numeric(Some(n)) => number_to_string(*n),
        FieldValue::Numeric(None) => String::new(),
        FieldValue::Float(Some(f)) => number_to_string(f64::from(*f)),
        FieldValue::Float(None) => String::new(),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Logical(Some(b)) => if *b { "1" } else { "0" }.to_string(),
        FieldValue::Logical(None) => String::new(),
        // ISO-форма, чтобы нормализатор дат принял её как есть
        FieldValue::Date(Some(d)) => {
            format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())
        }
        FieldValue::Date(None) => String::new(),
        FieldValue::Double(d) => number_to_string(*d),
        FieldValue::Currency(c) => number_to_string(*c),
        FieldValue::Memo(s) => s.trim().to_string(),
        _ => String::new(),
    }
}

fn number_to_string(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
