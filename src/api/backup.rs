// ==========================================
// Резервная копия базы перед фиксацией
// ==========================================
// Отдельный шаг файловой системы ДО открытия транзакции:
// сбой копирования прерывает импорт до любой мутации.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

/// Скопировать файл базы в каталог копий
///
/// Имя копии получает отметку времени; существующая база
/// обязательна, каталог копий создаётся по необходимости.
pub fn snapshot(store_path: &Path, backup_dir: &Path) -> ImportResult<PathBuf> {
    if !store_path.exists() {
        return Err(ImportError::BackupFailed(format!(
            "файл базы не найден: {}",
            store_path.display()
        )));
    }

    std::fs::create_dir_all(backup_dir)
        .map_err(|e| ImportError::BackupFailed(e.to_string()))?;

    let stem = store_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("store");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = backup_dir.join(format!("{}_{}.bak", stem, timestamp));

    std::fs::copy(store_path, &backup_path)
        .map_err(|e| ImportError::BackupFailed(e.to_string()))?;

    info!(backup = %backup_path.display(), "резервная копия базы создана");
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_copies_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("store.db");
        std::fs::write(&store, b"database bytes").unwrap();

        let backup_dir = dir.path().join("backups");
        let backup = snapshot(&store, &backup_dir).unwrap();

        assert!(backup.exists());
        assert_eq!(std::fs::read(&backup).unwrap(), b"database bytes");
    }

    #[test]
    fn test_snapshot_missing_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = snapshot(&dir.path().join("нет.db"), dir.path());
        assert!(matches!(result, Err(ImportError::BackupFailed(_))));
    }
}
