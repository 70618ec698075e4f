// ==========================================
// Чтение таблиц текстовых документов (docx/odt)
// ==========================================
// Оба формата — zip-контейнер с XML внутри; таблицы
// вытаскиваются потоковым проходом quick-xml по событиям.
// Одна сырая таблица на каждую таблицу документа.
// ==========================================

use crate::importer::raw_table::RawTable;
use crate::importer::readers::{row_is_blank, TableReader};
use anyhow::Context;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read as _;
use std::path::Path;

/// Имена элементов таблицы в конкретной схеме
struct TableTags {
    table: &'static [u8],
    row: &'static [u8],
    cell: &'static [u8],
}

const DOCX_TAGS: TableTags = TableTags {
    table: b"tbl",
    row: b"tr",
    cell: b"tc",
};

const ODT_TAGS: TableTags = TableTags {
    table: b"table",
    row: b"table-row",
    cell: b"table-cell",
};

pub struct DocumentReader;

impl TableReader for DocumentReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["docx", "odt"]
    }

    fn read(&self, path: &Path) -> anyhow::Result<Vec<RawTable>> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let (part, tags) = match extension.as_str() {
            "docx" => ("word/document.xml", DOCX_TAGS),
            _ => ("content.xml", ODT_TAGS),
        };

        let file = std::fs::File::open(path)?;
        let mut archive = zip::ZipArchive::new(file).context("не zip-контейнер")?;
        let mut entry = archive
            .by_name(part)
            .with_context(|| format!("в контейнере нет {}", part))?;
        let mut xml = String::new();
        entry.read_to_string(&mut xml)?;

        Ok(extract_tables(&xml, &tags))
    }
}

/// Все таблицы из XML-содержимого документа
fn extract_tables(xml: &str, tags: &TableTags) -> Vec<RawTable> {
    let mut reader = Reader::from_str(xml);

    let mut tables: Vec<Vec<Vec<String>>> = Vec::new();
    let mut grid: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut table_depth: usize = 0;
    let mut in_cell = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                let local = name.as_ref();
                if local == tags.table {
                    table_depth += 1;
                    if table_depth == 1 {
                        grid = Vec::new();
                    }
                } else if table_depth == 1 && local == tags.row {
                    row = Vec::new();
                } else if table_depth == 1 && local == tags.cell {
                    row.push(String::new());
                    in_cell = true;
                }
            }
            Ok(Event::Empty(e)) => {
                // самозакрытая пустая ячейка
                if table_depth == 1 && e.local_name().as_ref() == tags.cell {
                    row.push(String::new());
                }
            }
            Ok(Event::Text(t)) => {
                if in_cell {
                    if let Ok(text) = t.unescape() {
                        if let Some(cell) = row.last_mut() {
                            if !cell.is_empty() && !text.trim().is_empty() {
                                cell.push(' ');
                            }
                            cell.push_str(text.trim());
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                let local = name.as_ref();
                if local == tags.table {
                    table_depth = table_depth.saturating_sub(1);
                    if table_depth == 0 && !grid.is_empty() {
                        tables.push(std::mem::take(&mut grid));
                    }
                } else if table_depth == 1 && local == tags.row {
                    grid.push(std::mem::take(&mut row));
                } else if table_depth == 1 && local == tags.cell {
                    in_cell = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break, // битый XML: отдаём что успели
            _ => {}
        }
    }

    tables.into_iter().map(grid_to_table).collect()
}

/// Сетка строк -> таблица
///
/// Первая строка становится заголовком только при согласованном
/// числе колонок во всех строках; иначе таблица без заголовка.
fn grid_to_table(grid: Vec<Vec<String>>) -> RawTable {
    let consistent = grid
        .first()
        .map(|first| grid.iter().all(|r| r.len() == first.len()))
        .unwrap_or(false);

    let mut grid = grid;
    let headers = if consistent && grid.len() > 1 {
        grid.remove(0)
    } else {
        Vec::new()
    };

    let rows = grid.into_iter().filter(|r| !row_is_blank(r)).collect();
    RawTable::new(headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ODT_CONTENT: &str = r#"<?xml version="1.0"?>
<office:document-content xmlns:office="o" xmlns:table="t" xmlns:text="x">
 <office:body><office:text>
  <table:table table:name="Т1">
   <table:table-row>
    <table:table-cell><text:p>ФИО</text:p></table:table-cell>
    <table:table-cell><text:p>Табельный №</text:p></table:table-cell>
   </table:table-row>
   <table:table-row>
    <table:table-cell><text:p>Иванов И.И.</text:p></table:table-cell>
    <table:table-cell><text:p>101</text:p></table:table-cell>
   </table:table-row>
  </table:table>
 </office:text></office:body>
</office:document-content>"#;

    #[test]
    fn test_odt_table_extraction() {
        let tables = extract_tables(ODT_CONTENT, &ODT_TAGS);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["ФИО", "Табельный №"]);
        assert_eq!(tables[0].rows, vec![vec!["Иванов И.И.", "101"]]);
    }

    #[test]
    fn test_docx_table_extraction() {
        let xml = r#"<w:document xmlns:w="w"><w:body>
          <w:tbl>
            <w:tr><w:tc><w:p><w:r><w:t>Наименование</w:t></w:r></w:p></w:tc>
                  <w:tc><w:p><w:r><w:t>Цена</w:t></w:r></w:p></w:tc></w:tr>
            <w:tr><w:tc><w:p><w:r><w:t>Сварка</w:t></w:r></w:p></w:tc>
                  <w:tc><w:p><w:r><w:t>150</w:t></w:r></w:p></w:tc></w:tr>
          </w:tbl>
        </w:body></w:document>"#;
        let tables = extract_tables(xml, &DOCX_TAGS);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["Наименование", "Цена"]);
        assert_eq!(tables[0].rows, vec![vec!["Сварка", "150"]]);
    }

    #[test]
    fn test_ragged_grid_is_headerless() {
        let xml = r#"<w:document xmlns:w="w"><w:body><w:tbl>
            <w:tr><w:tc><w:p><w:r><w:t>а</w:t></w:r></w:p></w:tc></w:tr>
            <w:tr><w:tc><w:p><w:r><w:t>б</w:t></w:r></w:p></w:tc>
                  <w:tc><w:p><w:r><w:t>в</w:t></w:r></w:p></w:tc></w:tr>
        </w:tbl></w:body></w:document>"#;
        let tables = extract_tables(xml, &DOCX_TAGS);
        assert!(tables[0].headers.is_empty());
        assert_eq!(tables[0].rows.len(), 2);
    }
}
