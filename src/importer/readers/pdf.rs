// ==========================================
// Чтение таблиц из PDF
// ==========================================
// Извлекается текстовый слой; строки страницы режутся на ячейки
// по табуляции и пробельным промежуткам из двух и более пробелов.
// Одна сырая таблица на страницу.
// ==========================================

use crate::importer::raw_table::RawTable;
use crate::importer::readers::TableReader;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static CELL_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t|\s{2,}").unwrap());

pub struct PdfReader;

impl TableReader for PdfReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn read(&self, path: &Path) -> anyhow::Result<Vec<RawTable>> {
        let text = pdf_extract::extract_text(path)?;
        Ok(pages_to_tables(&text))
    }
}

fn pages_to_tables(text: &str) -> Vec<RawTable> {
    text.split('\u{c}')
        .filter_map(page_to_table)
        .collect()
}

fn page_to_table(page: &str) -> Option<RawTable> {
    let mut lines: Vec<Vec<String>> = page
        .lines()
        .map(split_line_into_cells)
        .filter(|cells| !cells.is_empty())
        .collect();
    if lines.is_empty() {
        return None;
    }

    let headers = lines.remove(0);
    Some(RawTable::new(headers, lines))
}

/// Строка текстового слоя -> ячейки
fn split_line_into_cells(line: &str) -> Vec<String> {
    CELL_SPLIT
        .split(line.trim())
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect()
}
