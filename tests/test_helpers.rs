// ==========================================
// Общие помощники интеграционных тестов
// ==========================================

use naryad_import::ImportConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Временная конфигурация: база, отчёты и копии в одном каталоге
pub fn test_config(dir: &TempDir) -> ImportConfig {
    ImportConfig::new(dir.path().join("store.db"))
        .with_report_dir(dir.path().join("reports"))
        .with_backup_dir(dir.path().join("backups"))
        .with_reference_year(2025)
}

/// Записать файл-фикстуру и вернуть путь
pub fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Число строк таблицы в базе конфигурации
pub fn count_rows(config: &ImportConfig, table: &str) -> i64 {
    let conn = rusqlite::Connection::open(&config.store_path).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

/// Прейскурант видов работ в CSV
pub fn price_list_csv(rows: &[(&str, &str, &str)]) -> String {
    let mut out = String::from("Наименование работ;Ед. изм.;Цена\n");
    for (name, unit, price) in rows {
        out.push_str(&format!("{};{};{}\n", name, unit, price));
    }
    out
}

#[allow(dead_code)]
pub fn fixture_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[allow(dead_code)]
pub fn read_report(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
