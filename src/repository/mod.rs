// ==========================================
// Слой хранилища
// ==========================================
// Красная линия: без бизнес-логики, только доступ к данным.
// Вся запись одного импорта идёт в единственной транзакции,
// поэтому операции принимают &Connection и вызываются внутри
// ImportStore::with_transaction.
// ==========================================

pub mod catalog_repo;
pub mod error;
pub mod order_repo;
pub mod schema;

pub use error::{RepositoryError, RepositoryResult};

use crate::db::open_sqlite_connection;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// Каноническое хранилище
///
/// Владеет соединением; схема инициализируется при открытии.
pub struct ImportStore {
    conn: Arc<Mutex<Connection>>,
}

impl ImportStore {
    /// Открыть (или создать) базу по пути
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Обернуть уже открытое соединение
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            schema::init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Выполнить замыкание в одной транзакции
    ///
    /// Фиксация при Ok, откат при Err (транзакция откатывается
    /// при сбросе без commit).
    pub fn with_transaction<T>(
        &self,
        f: impl FnOnce(&Connection) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Выполнить замыкание на соединении без транзакции (чтение)
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let conn = self.get_conn()?;
        f(&conn)
    }

    /// Число строк по каждой таблице хранилища
    ///
    /// Служебный срез для проверки, что предпросмотр ничего не пишет.
    pub fn table_counts(&self) -> RepositoryResult<Vec<(String, i64)>> {
        let conn = self.get_conn()?;
        let mut counts = Vec::new();
        for table in schema::TABLES {
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", table),
                [],
                |row| row.get(0),
            )?;
            counts.push((table.to_string(), count));
        }
        Ok(counts)
    }
}
