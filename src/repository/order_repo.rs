// ==========================================
// Запись нарядов
// ==========================================
// Группа ведомости разворачивается в наряды: по одному наряду
// на каждое изделие группы с ПОЛНЫМ списком строк работ
// (объёмы между изделиями не делятся). Сумма наряда делится
// поровну между работниками; остаток округления достаётся
// последнему в порядке перечисления.
// ==========================================

use crate::domain::entities::{JobType, OrderGroup, Worker};
use crate::domain::types::UpsertStats;
use crate::repository::catalog_repo::{
    find_job_type_id, find_product, find_worker_id, get_or_create_contract, insert_product,
    insert_worker, upsert_job_types,
};
use crate::repository::error::RepositoryResult;
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::debug;
use uuid::Uuid;

/// Шифр контракта-заглушки для нарядов без контракта
pub const DEFAULT_CONTRACT_CODE: &str = "Без контракта";

/// Итог записи нарядов
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderCommitStats {
    /// Создано нарядов
    pub orders_added: usize,
    pub contracts: UpsertStats,
    pub products: UpsertStats,
    pub job_types: UpsertStats,
    pub workers: UpsertStats,
}

/// Записать все группы ведомости
///
/// Группы без строк работ отбрасываются до вызова; на всякий
/// случай здесь они тоже пропускаются.
pub fn commit_order_groups(
    conn: &Connection,
    groups: &[OrderGroup],
) -> RepositoryResult<OrderCommitStats> {
    let mut stats = OrderCommitStats::default();

    for group in groups {
        if group.items.is_empty() {
            continue;
        }
        commit_group(conn, group, &mut stats)?;
    }

    Ok(stats)
}

fn commit_group(
    conn: &Connection,
    group: &OrderGroup,
    stats: &mut OrderCommitStats,
) -> RepositoryResult<()> {
    // === Изделия и контракт группы ===
    let mut resolved: Vec<(Option<i64>, Option<i64>)> = Vec::new();
    for product_no in &group.products {
        match find_product(conn, Some(product_no), product_no)? {
            Some((id, contract_id)) => resolved.push((Some(id), contract_id)),
            None => resolved.push((None, None)),
        }
    }

    // контракт группы: первый контракт среди найденных изделий,
    // иначе контракт-заглушка
    let contract_id = match resolved.iter().find_map(|(_, c)| *c) {
        Some(id) => id,
        None => {
            let (id, created) = get_or_create_contract(conn, DEFAULT_CONTRACT_CODE)?;
            if created {
                stats.contracts.added += 1;
            }
            id
        }
    };

    // недостающие изделия достраиваются по номеру
    let mut product_ids: Vec<Option<i64>> = Vec::new();
    for (index, (found, _)) in resolved.iter().enumerate() {
        match found {
            Some(id) => product_ids.push(Some(*id)),
            None => {
                let product_no = &group.products[index];
                let id = insert_product(conn, product_no, Some(product_no), Some(contract_id))?;
                stats.products.added += 1;
                product_ids.push(Some(id));
            }
        }
    }
    // группа без шапки изделий даёт один наряд без изделия
    if product_ids.is_empty() {
        product_ids.push(None);
    }

    // === Виды работ: расценки поддерживаются актуальными ===
    let mut distinct_jobs: Vec<JobType> = Vec::new();
    for item in &group.items {
        if !distinct_jobs.iter().any(|j| j.name == item.job_name) {
            distinct_jobs.push(JobType {
                name: item.job_name.clone(),
                unit: item.unit.clone(),
                price: item.unit_price,
            });
        }
    }
    stats.job_types.merge(upsert_job_types(conn, &distinct_jobs)?);

    // === Работники ===
    let mut worker_ids: Vec<i64> = Vec::new();
    for worker in &group.workers {
        let id = match find_worker_id(conn, &worker.full_name, worker.personnel_no.as_deref())? {
            Some(id) => id,
            None => {
                // не найден ни по табельному, ни по ФИО: временная запись
                let personnel_no = worker
                    .personnel_no
                    .clone()
                    .unwrap_or_else(generated_personnel_no);
                let id = insert_worker(
                    conn,
                    &Worker {
                        full_name: worker.full_name.clone(),
                        personnel_no: Some(personnel_no),
                        department: None,
                        position: None,
                        status: None,
                    },
                )?;
                stats.workers.added += 1;
                id
            }
        };
        if !worker_ids.contains(&id) {
            worker_ids.push(id);
        }
    }

    // === Наряды: по одному на изделие, строки не делятся ===
    let total = group.total_amount();
    let allocations = equal_split(total, worker_ids.len());

    for product_id in product_ids {
        let order_id = insert_order(conn, group, product_id, contract_id, total)?;
        for item in &group.items {
            let job_type_id = find_job_type_id(conn, &item.job_name)?;
            conn.execute(
                "INSERT INTO work_order_items
                    (order_id, job_type_id, job_name, unit, unit_price, quantity, amount)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    order_id,
                    job_type_id,
                    item.job_name,
                    item.unit,
                    item.unit_price,
                    item.quantity,
                    item.amount,
                ],
            )?;
        }
        for (worker_id, share) in worker_ids.iter().zip(&allocations) {
            conn.execute(
                "INSERT INTO work_order_workers (order_id, worker_id, amount)
                 VALUES (?1, ?2, ?3)",
                params![order_id, worker_id, share],
            )?;
        }
        stats.orders_added += 1;
        debug!(
            order_id = order_id,
            date = %group.date,
            items = group.items.len(),
            workers = worker_ids.len(),
            "наряд записан"
        );
    }

    Ok(())
}

fn insert_order(
    conn: &Connection,
    group: &OrderGroup,
    product_id: Option<i64>,
    contract_id: i64,
    total: f64,
) -> RepositoryResult<i64> {
    conn.execute(
        "INSERT INTO work_orders (order_date, product_id, contract_id, total_amount, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            group.date.to_string(),
            product_id,
            contract_id,
            total,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Временный табельный номер для работника, не найденного в базе
fn generated_personnel_no() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("ВРЕМ-{}", &id[..8])
}

/// Равные доли суммы с остатком округления у последнего
///
/// Каждая доля округлена до копеек; сумма долей равна total в
/// точности, последняя доля принимает разницу.
pub fn equal_split(total: f64, workers: usize) -> Vec<f64> {
    if workers == 0 {
        return Vec::new();
    }
    let share = round2(total / workers as f64);
    let mut allocations = vec![share; workers];
    let tail = round2(total - share * (workers as f64 - 1.0));
    allocations[workers - 1] = tail;
    allocations
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{OrderItem, OrderWorker};
    use crate::repository::schema::init_schema;
    use chrono::NaiveDate;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn item(name: &str, price: f64, qty: f64) -> OrderItem {
        OrderItem {
            job_name: name.to_string(),
            unit: "шт.".to_string(),
            unit_price: price,
            quantity: qty,
            amount: price * qty,
        }
    }

    fn group(products: &[&str], items: Vec<OrderItem>, workers: &[&str]) -> OrderGroup {
        OrderGroup {
            date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            products: products.iter().map(|s| s.to_string()).collect(),
            items,
            workers: workers
                .iter()
                .map(|name| OrderWorker {
                    full_name: name.to_string(),
                    personnel_no: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_equal_split_sums_exactly() {
        let allocations = equal_split(100.0, 3);
        assert_eq!(allocations.len(), 3);
        let sum: f64 = allocations.iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
        let ideal = 100.0 / 3.0;
        for share in &allocations[..2] {
            assert!((share - ideal).abs() <= 0.01);
        }
    }

    #[test]
    fn test_equal_split_zero_workers() {
        assert!(equal_split(100.0, 0).is_empty());
    }

    #[test]
    fn test_one_order_per_product_with_full_items() {
        let conn = test_conn();
        let g = group(
            &["55", "77"],
            vec![item("Сварка", 150.0, 2.0), item("Окраска", 80.0, 1.0)],
            &["Иванов И.И."],
        );
        let stats = commit_order_groups(&conn, &[g]).unwrap();
        assert_eq!(stats.orders_added, 2);
        assert_eq!(stats.products.added, 2);
        assert_eq!(stats.workers.added, 1);

        // каждый наряд несёт полный список строк
        let items: i64 = conn
            .query_row("SELECT COUNT(*) FROM work_order_items", [], |r| r.get(0))
            .unwrap();
        assert_eq!(items, 4);

        let totals: f64 = conn
            .query_row("SELECT SUM(total_amount) FROM work_orders", [], |r| r.get(0))
            .unwrap();
        assert_eq!(totals, 760.0);
    }

    #[test]
    fn test_default_contract_created_once() {
        let conn = test_conn();
        let g1 = group(&["55"], vec![item("Сварка", 150.0, 1.0)], &["Иванов"]);
        let g2 = group(&["77"], vec![item("Окраска", 80.0, 1.0)], &["Иванов"]);
        let stats = commit_order_groups(&conn, &[g1, g2]).unwrap();
        assert_eq!(stats.contracts.added, 1);

        let code: String = conn
            .query_row("SELECT code FROM contracts LIMIT 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(code, DEFAULT_CONTRACT_CODE);
    }

    #[test]
    fn test_group_without_products_still_committed() {
        let conn = test_conn();
        let g = group(&[], vec![item("Сварка", 150.0, 1.0)], &["Иванов"]);
        let stats = commit_order_groups(&conn, &[g]).unwrap();
        assert_eq!(stats.orders_added, 1);

        let product_id: Option<i64> = conn
            .query_row("SELECT product_id FROM work_orders LIMIT 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(product_id, None);
    }

    #[test]
    fn test_allocations_split_with_remainder_to_last() {
        let conn = test_conn();
        let g = group(
            &["55"],
            vec![item("Сварка", 100.0, 1.0)],
            &["Иванов", "Петров", "Сидоров"],
        );
        commit_order_groups(&conn, &[g]).unwrap();

        let mut stmt = conn
            .prepare("SELECT amount FROM work_order_workers ORDER BY id")
            .unwrap();
        let shares: Vec<f64> = stmt
            .query_map([], |r| r.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(shares, vec![33.33, 33.33, 33.34]);
    }

    #[test]
    fn test_job_types_created_from_items() {
        let conn = test_conn();
        let g = group(&["55"], vec![item("Сварка", 150.0, 1.0)], &["Иванов"]);
        commit_order_groups(&conn, &[g]).unwrap();

        let price: f64 = conn
            .query_row(
                "SELECT price FROM job_types WHERE name = 'Сварка'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(price, 150.0);
    }

    #[test]
    fn test_empty_groups_skipped() {
        let conn = test_conn();
        let g = group(&["55"], vec![], &["Иванов"]);
        let stats = commit_order_groups(&conn, &[g]).unwrap();
        assert_eq!(stats.orders_added, 0);
    }
}
