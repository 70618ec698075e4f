// ==========================================
// Чтение записеориентированного XML
// ==========================================
// Дети корневого элемента считаются записями; их атрибуты и
// дочерние элементы с текстом — полями. Ничего глубже второго
// уровня вложенности не интерпретируется.
// ==========================================

use crate::importer::raw_table::RawTable;
use crate::importer::readers::TableReader;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

pub struct XmlReader;

impl TableReader for XmlReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["xml"]
    }

    fn read(&self, path: &Path) -> anyhow::Result<Vec<RawTable>> {
        let xml = std::fs::read_to_string(path)?;
        Ok(flatten_records(&xml))
    }
}

/// Поля одной записи в порядке появления
type Record = Vec<(String, String)>;

fn flatten_records(xml: &str) -> Vec<RawTable> {
    let mut reader = Reader::from_str(xml);

    let mut records: Vec<Record> = Vec::new();
    let mut current: Option<Record> = None;
    let mut field: Option<String> = None;
    let mut field_value = String::new();
    let mut depth: usize = 0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                match depth {
                    // ребёнок корня — новая запись с её атрибутами
                    2 => {
                        let mut record = Record::new();
                        collect_attributes(&e, &mut record);
                        current = Some(record);
                    }
                    // поле записи
                    3 => {
                        field = Some(local_name_string(e.local_name().as_ref()));
                        field_value.clear();
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => match depth + 1 {
                2 => {
                    let mut record = Record::new();
                    collect_attributes(&e, &mut record);
                    records.push(record);
                }
                3 => {
                    if let Some(record) = current.as_mut() {
                        record.push((local_name_string(e.local_name().as_ref()), String::new()));
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if depth >= 3 && field.is_some() {
                    if let Ok(text) = t.unescape() {
                        field_value.push_str(text.trim());
                    }
                }
            }
            Ok(Event::End(_)) => {
                match depth {
                    2 => {
                        if let Some(record) = current.take() {
                            records.push(record);
                        }
                    }
                    3 => {
                        if let (Some(record), Some(name)) = (current.as_mut(), field.take()) {
                            record.push((name, std::mem::take(&mut field_value)));
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    if records.is_empty() {
        return Vec::new();
    }

    // колонки в порядке первого появления
    let mut headers: Vec<String> = Vec::new();
    for record in &records {
        for (name, _) in record {
            if !headers.contains(name) {
                headers.push(name.clone());
            }
        }
    }
    if headers.is_empty() {
        return Vec::new();
    }

    let rows = records
        .into_iter()
        .map(|record| {
            headers
                .iter()
                .map(|h| {
                    record
                        .iter()
                        .find(|(name, _)| name == h)
                        .map(|(_, value)| value.trim().to_string())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    vec![RawTable::new(headers, rows)]
}

fn collect_attributes(e: &quick_xml::events::BytesStart<'_>, record: &mut Record) {
    for attr in e.attributes().flatten() {
        let name = local_name_string(attr.key.local_name().as_ref());
        if let Ok(value) = attr.unescape_value() {
            record.push((name, value.trim().to_string()));
        }
    }
}

fn local_name_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_elements_become_columns() {
        let xml = r#"<workers>
            <worker><fio>Иванов И.И.</fio><tab_no>101</tab_no></worker>
            <worker><fio>Петров П.П.</fio><tab_no>102</tab_no><dept>Цех 2</dept></worker>
        </workers>"#;
        let tables = flatten_records(xml);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["fio", "tab_no", "dept"]);
        assert_eq!(tables[0].rows[0], vec!["Иванов И.И.", "101", ""]);
        assert_eq!(tables[0].rows[1], vec!["Петров П.П.", "102", "Цех 2"]);
    }

    #[test]
    fn test_attributes_become_columns() {
        let xml = r#"<list><row fio="Иванов" tab="7"/><row fio="Петров" tab="8"/></list>"#;
        let tables = flatten_records(xml);
        assert_eq!(tables[0].headers, vec!["fio", "tab"]);
        assert_eq!(tables[0].rows.len(), 2);
    }

    #[test]
    fn test_plain_text_input_has_no_records() {
        assert!(flatten_records("не xml вовсе").is_empty());
    }
}
