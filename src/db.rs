// ==========================================
// Инициализация соединения SQLite
// ==========================================
// Цели:
// - единые PRAGMA для всех Connection::open, чтобы внешние ключи
//   были включены в каждом модуле одинаково
// - единый busy_timeout против спорадических busy при записи
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// busy_timeout по умолчанию (мс)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Единые PRAGMA для соединения SQLite
///
/// foreign_keys и busy_timeout действуют на уровне соединения,
/// поэтому настраиваются при каждом открытии.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Открыть соединение SQLite с едиными настройками
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_connection_enables_foreign_keys() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let conn = open_sqlite_connection(temp.path().to_str().unwrap()).unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }
}
