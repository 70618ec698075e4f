// ==========================================
// HTML-отчёт импорта
// ==========================================
// Человекочитаемый предпросмотр / итог в файле с отметкой
// времени. Никаких обращений к базе.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Записать отчёт и вернуть путь к файлу
///
/// Фрагменты тела уже являются готовым HTML (абзацы/списки);
/// экранирование текста — забота вызывающего через escape_html.
pub fn write_html_report(
    dir: &Path,
    stem: &str,
    title: &str,
    fragments: &[String],
) -> ImportResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| ImportError::ReportWriteFailed(e.to_string()))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{}_{}.html", stem, timestamp));

    let mut body = String::new();
    for fragment in fragments {
        body.push_str(fragment);
        body.push('\n');
    }

    let html = format!(
        "<!DOCTYPE html>\n<html lang=\"ru\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>body{{font-family:sans-serif;margin:2em}}h1{{font-size:1.3em}}\
         ul{{line-height:1.5}}</style>\n</head>\n<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n",
        title = escape_html(title),
        body = body,
    );

    std::fs::write(&path, html).map_err(|e| ImportError::ReportWriteFailed(e.to_string()))?;
    Ok(path)
}

/// Экранирование текста для вставки в HTML
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Абзац с экранированным текстом
pub fn paragraph(text: &str) -> String {
    format!("<p>{}</p>", escape_html(text))
}

/// Маркированный список с экранированными пунктами
pub fn bullet_list(items: &[String]) -> String {
    let mut out = String::from("<ul>");
    for item in items {
        out.push_str("<li>");
        out.push_str(&escape_html(item));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}
