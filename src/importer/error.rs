// ==========================================
// Ошибки слоя импорта
// ==========================================
// Инструмент: derive-макрос thiserror
// ==========================================

use crate::domain::types::TableKind;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Ошибки импорта
///
/// Сбои разбора конкретного формата ошибками НЕ являются —
/// они вырождаются в ReadOutcome::Unsupported (см. readers).
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Файлы =====
    #[error("Файл не существует: {0}")]
    FileNotFound(String),

    // ===== Разбор таблиц =====
    #[error("В таблице вида «{kind}» не найдены обязательные колонки: {columns:?}")]
    RequiredColumnsMissing {
        kind: TableKind,
        columns: Vec<String>,
    },

    // ===== Подготовка фиксации =====
    #[error("Не удалось создать резервную копию базы: {0}")]
    BackupFailed(String),

    #[error("Не удалось записать HTML-отчёт: {0}")]
    ReportWriteFailed(String),

    // ===== Хранилище =====
    #[error("Ошибка хранилища: {0}")]
    Store(#[from] RepositoryError),

    // ===== Общее =====
    #[error("Внутренняя ошибка: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Псевдоним результата
pub type ImportResult<T> = Result<T, ImportError>;
