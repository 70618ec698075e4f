// ==========================================
// Upsert справочников по естественным ключам
// ==========================================
// Вставка считается «added», обновление — «updated»; дубликат
// ключа ошибкой не бывает. Сравнение ключей — через
// normalize_for_search на стороне Rust: NOCASE в SQLite не
// сворачивает кириллицу.
// ==========================================

use crate::domain::entities::{Contract, JobType, Product, Worker};
use crate::domain::types::UpsertStats;
use crate::importer::normalize::normalize_for_search;
use crate::repository::error::RepositoryResult;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

fn now() -> String {
    Utc::now().to_rfc3339()
}

/// id первой строки, чей текстовый ключ совпадает после нормализации
///
/// sql обязан отдавать пары (id, текст ключа).
fn find_by_text(conn: &Connection, sql: &str, needle: &str) -> RepositoryResult<Option<i64>> {
    let needle = match normalize_for_search(needle) {
        Some(needle) => needle,
        None => return Ok(None),
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (id, value) = row?;
        if normalize_for_search(&value).as_deref() == Some(needle.as_str()) {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

// ==========================================
// Работники
// ==========================================

/// Работник по табельному номеру, затем по ФИО
pub fn find_worker_id(
    conn: &Connection,
    full_name: &str,
    personnel_no: Option<&str>,
) -> RepositoryResult<Option<i64>> {
    if let Some(no) = personnel_no {
        let no = no.trim();
        if !no.is_empty() {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT id FROM workers WHERE personnel_no = ?1",
                    params![no],
                    |row| row.get(0),
                )
                .optional()?;
            if found.is_some() {
                return Ok(found);
            }
        }
    }
    find_by_text(conn, "SELECT id, full_name FROM workers", full_name)
}

pub fn insert_worker(conn: &Connection, worker: &Worker) -> RepositoryResult<i64> {
    conn.execute(
        "INSERT INTO workers (full_name, personnel_no, department, position, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            worker.full_name,
            worker.personnel_no,
            worker.department,
            worker.position,
            worker.status,
            now(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn upsert_workers(conn: &Connection, workers: &[Worker]) -> RepositoryResult<UpsertStats> {
    let mut stats = UpsertStats::default();
    for worker in workers {
        match find_worker_id(conn, &worker.full_name, worker.personnel_no.as_deref())? {
            Some(id) => {
                conn.execute(
                    "UPDATE workers SET
                        full_name = ?1,
                        personnel_no = COALESCE(?2, personnel_no),
                        department = COALESCE(?3, department),
                        position = COALESCE(?4, position),
                        status = COALESCE(?5, status),
                        updated_at = ?6
                     WHERE id = ?7",
                    params![
                        worker.full_name,
                        worker.personnel_no,
                        worker.department,
                        worker.position,
                        worker.status,
                        now(),
                        id,
                    ],
                )?;
                stats.updated += 1;
            }
            None => {
                insert_worker(conn, worker)?;
                stats.added += 1;
            }
        }
    }
    Ok(stats)
}

// ==========================================
// Виды работ
// ==========================================

pub fn find_job_type_id(conn: &Connection, name: &str) -> RepositoryResult<Option<i64>> {
    find_by_text(conn, "SELECT id, name FROM job_types", name)
}

pub fn upsert_job_types(conn: &Connection, job_types: &[JobType]) -> RepositoryResult<UpsertStats> {
    let mut stats = UpsertStats::default();
    for job_type in job_types {
        match find_job_type_id(conn, &job_type.name)? {
            Some(id) => {
                conn.execute(
                    "UPDATE job_types SET unit = ?1, price = ?2, updated_at = ?3 WHERE id = ?4",
                    params![job_type.unit, job_type.price, now(), id],
                )?;
                stats.updated += 1;
            }
            None => {
                conn.execute(
                    "INSERT INTO job_types (name, unit, price, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                    params![job_type.name, job_type.unit, job_type.price, now()],
                )?;
                stats.added += 1;
            }
        }
    }
    Ok(stats)
}

// ==========================================
// Контракты
// ==========================================

pub fn find_contract_id(conn: &Connection, code: &str) -> RepositoryResult<Option<i64>> {
    find_by_text(conn, "SELECT id, code FROM contracts", code)
}

/// Контракт по шифру; отсутствующий создаётся пустым каркасом
pub fn get_or_create_contract(conn: &Connection, code: &str) -> RepositoryResult<(i64, bool)> {
    if let Some(id) = find_contract_id(conn, code)? {
        return Ok((id, false));
    }
    conn.execute(
        "INSERT INTO contracts (code, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![code, now()],
    )?;
    Ok((conn.last_insert_rowid(), true))
}

fn load_contract(conn: &Connection, id: i64) -> RepositoryResult<Contract> {
    let contract = conn.query_row(
        "SELECT code, name, contract_type, executor, igk, contract_number,
                bank_account, start_date, end_date, description
         FROM contracts WHERE id = ?1",
        params![id],
        |row| {
            Ok(Contract {
                code: row.get(0)?,
                name: row.get(1)?,
                contract_type: row.get(2)?,
                executor: row.get(3)?,
                igk: row.get(4)?,
                contract_number: row.get(5)?,
                bank_account: row.get(6)?,
                start_date: row
                    .get::<_, Option<String>>(7)?
                    .and_then(|s| s.parse().ok()),
                end_date: row
                    .get::<_, Option<String>>(8)?
                    .and_then(|s| s.parse().ok()),
                description: row.get(9)?,
            })
        },
    )?;
    Ok(contract)
}

/// Снимок текущей строки контракта в журнал истории
///
/// Журнал только пополняется; редактирования и удаления нет.
fn snapshot_contract(conn: &Connection, id: i64) -> RepositoryResult<()> {
    let previous = load_contract(conn, id)?;
    let payload = serde_json::to_string(&previous)?;
    conn.execute(
        "INSERT INTO contract_history (contract_id, snapshot_json, changed_at)
         VALUES (?1, ?2, ?3)",
        params![id, payload, now()],
    )?;
    Ok(())
}

pub fn upsert_contracts(conn: &Connection, contracts: &[Contract]) -> RepositoryResult<UpsertStats> {
    let mut stats = UpsertStats::default();
    for contract in contracts {
        match find_contract_id(conn, &contract.code)? {
            Some(id) => {
                snapshot_contract(conn, id)?;
                conn.execute(
                    "UPDATE contracts SET
                        name = COALESCE(?1, name),
                        contract_type = COALESCE(?2, contract_type),
                        executor = COALESCE(?3, executor),
                        igk = COALESCE(?4, igk),
                        contract_number = COALESCE(?5, contract_number),
                        bank_account = COALESCE(?6, bank_account),
                        start_date = COALESCE(?7, start_date),
                        end_date = COALESCE(?8, end_date),
                        description = COALESCE(?9, description),
                        updated_at = ?10
                     WHERE id = ?11",
                    params![
                        contract.name,
                        contract.contract_type,
                        contract.executor,
                        contract.igk,
                        contract.contract_number,
                        contract.bank_account,
                        contract.start_date.map(|d| d.to_string()),
                        contract.end_date.map(|d| d.to_string()),
                        contract.description,
                        now(),
                        id,
                    ],
                )?;
                stats.updated += 1;
            }
            None => {
                conn.execute(
                    "INSERT INTO contracts
                        (code, name, contract_type, executor, igk, contract_number,
                         bank_account, start_date, end_date, description, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
                    params![
                        contract.code,
                        contract.name,
                        contract.contract_type,
                        contract.executor,
                        contract.igk,
                        contract.contract_number,
                        contract.bank_account,
                        contract.start_date.map(|d| d.to_string()),
                        contract.end_date.map(|d| d.to_string()),
                        contract.description,
                        now(),
                    ],
                )?;
                stats.added += 1;
            }
        }
    }
    Ok(stats)
}

// ==========================================
// Изделия
// ==========================================

/// Изделие по заводскому номеру, затем по наименованию
pub fn find_product(
    conn: &Connection,
    product_no: Option<&str>,
    name: &str,
) -> RepositoryResult<Option<(i64, Option<i64>)>> {
    if let Some(no) = product_no {
        let no = no.trim();
        if !no.is_empty() {
            let found: Option<(i64, Option<i64>)> = conn
                .query_row(
                    "SELECT id, contract_id FROM products WHERE product_no = ?1",
                    params![no],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            if found.is_some() {
                return Ok(found);
            }
        }
    }

    let id = find_by_text(conn, "SELECT id, name FROM products", name)?;
    match id {
        Some(id) => {
            let contract_id: Option<i64> = conn.query_row(
                "SELECT contract_id FROM products WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            Ok(Some((id, contract_id)))
        }
        None => Ok(None),
    }
}

pub fn insert_product(
    conn: &Connection,
    name: &str,
    product_no: Option<&str>,
    contract_id: Option<i64>,
) -> RepositoryResult<i64> {
    conn.execute(
        "INSERT INTO products (name, product_no, contract_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![name, product_no, contract_id, now()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn upsert_products(conn: &Connection, products: &[Product]) -> RepositoryResult<UpsertStats> {
    let mut stats = UpsertStats::default();
    for product in products {
        let contract_id = match &product.contract_code {
            Some(code) => Some(get_or_create_contract(conn, code)?.0),
            None => None,
        };

        match find_product(conn, product.product_no.as_deref(), &product.name)? {
            Some((id, _)) => {
                conn.execute(
                    "UPDATE products SET
                        name = ?1,
                        product_no = COALESCE(?2, product_no),
                        contract_id = COALESCE(?3, contract_id),
                        updated_at = ?4
                     WHERE id = ?5",
                    params![product.name, product.product_no, contract_id, now(), id],
                )?;
                stats.updated += 1;
            }
            None => {
                insert_product(
                    conn,
                    &product.name,
                    product.product_no.as_deref(),
                    contract_id,
                )?;
                stats.added += 1;
            }
        }
    }
    Ok(stats)
}
