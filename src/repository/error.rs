// ==========================================
// Ошибки слоя хранилища
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Ошибка SQLite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Не удалось захватить соединение: {0}")]
    LockError(String),

    #[error("Ошибка сериализации: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Псевдоним результата
pub type RepositoryResult<T> = Result<T, RepositoryError>;
