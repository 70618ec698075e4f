// ==========================================
// Чтение JSON-выгрузок
// ==========================================
// Принимается список объектов на верхнем уровне либо под
// ключом "data". Колонки — объединение ключей в порядке
// первого появления.
// ==========================================

use crate::importer::raw_table::RawTable;
use crate::importer::readers::TableReader;
use anyhow::anyhow;
use serde_json::Value;
use std::path::Path;

pub struct JsonReader;

impl TableReader for JsonReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn read(&self, path: &Path) -> anyhow::Result<Vec<RawTable>> {
        let text = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;

        let records = match &value {
            Value::Array(items) => items.as_slice(),
            Value::Object(map) => match map.get("data") {
                Some(Value::Array(items)) => items.as_slice(),
                _ => return Err(anyhow!("нет списка записей на верхнем уровне и под \"data\"")),
            },
            _ => return Err(anyhow!("верхний уровень не список и не объект")),
        };

        Ok(flatten(records))
    }
}

fn flatten(records: &[Value]) -> Vec<RawTable> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }
    }
    if headers.is_empty() {
        return Vec::new();
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .filter_map(|record| match record {
            Value::Object(map) => Some(
                headers
                    .iter()
                    .map(|h| map.get(h).map(scalar_to_string).unwrap_or_default())
                    .collect(),
            ),
            _ => None,
        })
        .collect();

    vec![RawTable::new(headers, rows)]
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        // вложенные структуры не интерпретируются
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_array() {
        let records: Vec<Value> = serde_json::from_str(
            r#"[{"наименование":"Сварка","цена":150},{"наименование":"Окраска","цена":80.5,"ед":"м2"}]"#,
        )
        .unwrap();
        let tables = flatten(&records);
        assert_eq!(tables[0].headers, vec!["наименование", "цена", "ед"]);
        assert_eq!(tables[0].rows[0], vec!["Сварка", "150", ""]);
        assert_eq!(tables[0].rows[1], vec!["Окраска", "80.5", "м2"]);
    }

    #[test]
    fn test_data_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, r#"{"data":[{"фио":"Иванов","таб":"101"}]}"#).unwrap();

        let tables = JsonReader.read(&path).unwrap();
        assert_eq!(tables[0].headers, vec!["фио", "таб"]);
        assert_eq!(tables[0].rows, vec![vec!["Иванов", "101"]]);
    }

    #[test]
    fn test_scalar_top_level_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scalar.json");
        std::fs::write(&path, "42").unwrap();
        assert!(JsonReader.read(&path).is_err());
    }
}
