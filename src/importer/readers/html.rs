// ==========================================
// Чтение HTML-таблиц
// ==========================================
// Одна сырая таблица на каждый элемент <table>.
// Первая строка с <th> (или просто первая) — заголовок.
// ==========================================

use crate::importer::raw_table::RawTable;
use crate::importer::readers::{row_is_blank, TableReader};
use anyhow::anyhow;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;

pub struct HtmlReader;

impl TableReader for HtmlReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["html", "htm"]
    }

    fn read(&self, path: &Path) -> anyhow::Result<Vec<RawTable>> {
        let bytes = std::fs::read(path)?;
        let text = match std::str::from_utf8(&bytes) {
            Ok(text) => text.to_string(),
            Err(_) => encoding_rs::WINDOWS_1251.decode(&bytes).0.into_owned(),
        };
        extract_tables(&text)
    }
}

fn extract_tables(html: &str) -> anyhow::Result<Vec<RawTable>> {
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    let document = Html::parse_document(html);

    let mut tables = Vec::new();
    for table in document.select(&table_sel) {
        let mut grid: Vec<Vec<String>> = Vec::new();
        for row in table.select(&row_sel) {
            let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
            if !cells.is_empty() {
                grid.push(cells);
            }
        }
        if grid.is_empty() {
            continue;
        }

        let headers = grid.remove(0);
        let rows = grid.into_iter().filter(|r| !row_is_blank(r)).collect();
        tables.push(RawTable::new(headers, rows));
    }

    Ok(tables)
}

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("селектор {:?}: {}", css, e))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    let text: String = cell.text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_tables_extracted() {
        let html = r#"<html><body>
            <table>
              <tr><th>Наименование работ</th><th>Ед. изм.</th><th>Цена</th></tr>
              <tr><td>Сварка</td><td>шт.</td><td>150</td></tr>
            </table>
            <table>
              <tr><th>ФИО</th><th>Табельный №</th></tr>
              <tr><td>Иванов  И.И.</td><td>101</td></tr>
            </table>
        </body></html>"#;

        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].headers, vec!["Наименование работ", "Ед. изм.", "Цена"]);
        assert_eq!(tables[1].rows[0][0], "Иванов И.И.");
    }

    #[test]
    fn test_tableless_html_is_empty() {
        let tables = extract_tables("<html><body><p>нет таблиц</p></body></html>").unwrap();
        assert!(tables.is_empty());
    }
}
