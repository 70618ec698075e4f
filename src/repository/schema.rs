// ==========================================
// Схема канонического хранилища
// ==========================================
// DDL идемпотентен: CREATE TABLE IF NOT EXISTS.
// История контрактов — только добавление, строки не правятся
// и не удаляются.
// ==========================================

use rusqlite::Connection;

/// Таблицы хранилища (порядок учитывает внешние ключи)
pub const TABLES: &[&str] = &[
    "workers",
    "job_types",
    "contracts",
    "contract_history",
    "products",
    "work_orders",
    "work_order_items",
    "work_order_workers",
];

const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS workers (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name    TEXT NOT NULL,
    personnel_no TEXT UNIQUE,
    department   TEXT,
    position     TEXT,
    status       TEXT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS job_types (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL UNIQUE,
    unit       TEXT NOT NULL,
    price      REAL NOT NULL CHECK (price >= 0),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contracts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    code            TEXT NOT NULL UNIQUE,
    name            TEXT,
    contract_type   TEXT,
    executor        TEXT,
    igk             TEXT,
    contract_number TEXT,
    bank_account    TEXT,
    start_date      TEXT,
    end_date        TEXT,
    description     TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contract_history (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    contract_id   INTEGER NOT NULL REFERENCES contracts(id),
    snapshot_json TEXT NOT NULL,
    changed_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    product_no  TEXT,
    contract_id INTEGER REFERENCES contracts(id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS work_orders (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    order_date   TEXT NOT NULL,
    product_id   INTEGER REFERENCES products(id),
    contract_id  INTEGER REFERENCES contracts(id),
    total_amount REAL NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS work_order_items (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id    INTEGER NOT NULL REFERENCES work_orders(id) ON DELETE CASCADE,
    job_type_id INTEGER REFERENCES job_types(id),
    job_name    TEXT NOT NULL,
    unit        TEXT NOT NULL,
    unit_price  REAL NOT NULL,
    quantity    REAL NOT NULL,
    amount      REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS work_order_workers (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id  INTEGER NOT NULL REFERENCES work_orders(id) ON DELETE CASCADE,
    worker_id INTEGER NOT NULL REFERENCES workers(id),
    amount    REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_product_no ON products(product_no);
CREATE INDEX IF NOT EXISTS idx_work_orders_date ON work_orders(order_date);
CREATE INDEX IF NOT EXISTS idx_contract_history_contract ON contract_history(contract_id);
"#;

/// Инициализация схемы (безопасна при повторных вызовах)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(DDL)
}
