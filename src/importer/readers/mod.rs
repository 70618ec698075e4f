// ==========================================
// Чтение сырых таблиц из файлов
// ==========================================
// Стратегия на формат, выбор по расширению через реестр.
// Политика fail-open: любой сбой разбора конкретного формата
// вырождается в Unsupported с причиной; жёсткая ошибка одна —
// файла не существует.
// ==========================================

pub mod dbf;
pub mod delimited;
pub mod document;
pub mod html;
pub mod json;
pub mod pdf;
pub mod spreadsheet;
pub mod xml;

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::raw_table::RawTable;
use std::path::Path;
use tracing::warn;

pub use dbf::DbfReader;
pub use delimited::DelimitedReader;
pub use document::DocumentReader;
pub use html::HtmlReader;
pub use json::JsonReader;
pub use pdf::PdfReader;
pub use spreadsheet::SpreadsheetReader;
pub use xml::XmlReader;

/// Итог чтения файла
///
/// Типизированная замена молчаливого «проглотили и вернули пусто»:
/// вызывающая сторона различает «таблиц нет» и «формат не прочитался».
#[derive(Debug)]
pub enum ReadOutcome {
    Tables(Vec<RawTable>),
    Unsupported { reason: String },
}

impl ReadOutcome {
    /// Таблицы либо пустой список (для мест, где причина не нужна)
    pub fn into_tables(self) -> Vec<RawTable> {
        match self {
            ReadOutcome::Tables(tables) => tables,
            ReadOutcome::Unsupported { .. } => Vec::new(),
        }
    }
}

/// Стратегия чтения одного семейства форматов
pub trait TableReader: Send + Sync {
    /// Расширения (в нижнем регистре), которые обслуживает стратегия
    fn extensions(&self) -> &'static [&'static str];

    /// Извлечь все таблицы файла
    ///
    /// Ошибка здесь означает «формат не прочитался»; реестр переведёт
    /// её в Unsupported. Проверять существование файла не нужно —
    /// это делает реестр до вызова.
    fn read(&self, path: &Path) -> anyhow::Result<Vec<RawTable>>;
}

/// Реестр стратегий чтения
pub struct ReaderRegistry {
    readers: Vec<Box<dyn TableReader>>,
    /// Фолбэк для незнакомых расширений
    fallback: Box<dyn TableReader>,
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderRegistry {
    /// Реестр со всеми штатными стратегиями
    pub fn new() -> Self {
        Self {
            readers: vec![
                Box::new(SpreadsheetReader),
                Box::new(DelimitedReader),
                Box::new(DocumentReader),
                Box::new(XmlReader),
                Box::new(DbfReader),
                Box::new(JsonReader),
                Box::new(HtmlReader),
                Box::new(PdfReader),
            ],
            // незнакомое расширение пробуем как текст с разделителями
            fallback: Box::new(DelimitedReader),
        }
    }

    /// Стратегия для расширения (или фолбэк)
    fn reader_for(&self, extension: &str) -> &dyn TableReader {
        self.readers
            .iter()
            .find(|r| r.extensions().contains(&extension))
            .map(Box::as_ref)
            .unwrap_or(self.fallback.as_ref())
    }

    /// Прочитать все таблицы файла
    ///
    /// Возбуждает только FileNotFound; остальные сбои — Unsupported.
    pub fn read(&self, path: &Path) -> ImportResult<ReadOutcome> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let reader = self.reader_for(&extension);
        match reader.read(path) {
            Ok(tables) => Ok(ReadOutcome::Tables(tables)),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    extension = %extension,
                    error = %err,
                    "файл не прочитан, формат пропущен"
                );
                Ok(ReadOutcome::Unsupported {
                    reason: err.to_string(),
                })
            }
        }
    }
}

/// Прочитать все таблицы файла штатным реестром
pub fn read_any_tabular(path: &Path) -> ImportResult<ReadOutcome> {
    ReaderRegistry::new().read(path)
}

/// Пустые и полностью пустые строки не несут данных
pub(crate) fn row_is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}
