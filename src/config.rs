// ==========================================
// Конфигурация импорта
// ==========================================
// Явное неизменяемое значение, передаваемое в точку входа.
// Глобального состояния процесса модуль не читает.
// ==========================================

use std::path::PathBuf;

/// Конфигурация одного вызова импорта
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Путь к файлу канонической базы (SQLite)
    pub store_path: PathBuf,

    /// Каталог для HTML-отчётов
    pub report_dir: PathBuf,

    /// Каталог для резервных копий базы
    pub backup_dir: PathBuf,

    /// Год по умолчанию для дат вида "16.06." без года в шапке листа
    pub reference_year: Option<i32>,

    /// Локаль отчётов ("ru" / "en")
    pub locale: String,
}

impl ImportConfig {
    /// Конфигурация с каталогами по умолчанию рядом с базой
    ///
    /// Отчёты и копии складываются в подкаталоги каталога данных
    /// пользователя; если его нет, рядом с самой базой.
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        let store_path = store_path.into();
        let base = dirs::data_dir()
            .map(|d| d.join("naryad-import"))
            .or_else(|| store_path.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            report_dir: base.join("reports"),
            backup_dir: base.join("backups"),
            reference_year: None,
            locale: "ru".to_string(),
            store_path,
        }
    }

    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = dir.into();
        self
    }

    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_dirs() {
        let config = ImportConfig::new("/tmp/base.db")
            .with_report_dir("/tmp/r")
            .with_backup_dir("/tmp/b")
            .with_reference_year(2025);

        assert_eq!(config.report_dir, PathBuf::from("/tmp/r"));
        assert_eq!(config.backup_dir, PathBuf::from("/tmp/b"));
        assert_eq!(config.reference_year, Some(2025));
    }
}
