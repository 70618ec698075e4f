// ==========================================
// Разбор полей по видам таблиц
// ==========================================
// Один разборщик на вид справочника. Колонки разрешаются один раз
// по декларативным спискам кандидатов; отсутствие обязательной
// колонки — ошибка (таблица была смаршрутизирована ошибочно),
// строка без естественного ключа — молчаливый пропуск.
// ==========================================

use crate::domain::entities::{Contract, JobType, Product, Worker};
use crate::domain::types::TableKind;
use crate::importer::columns::{resolve_columns, ColumnSpec};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::normalize::{normalize_date, normalize_number};
use crate::importer::raw_table::RawTable;

/// Итог разбора одной таблицы
#[derive(Debug)]
pub struct ParsedRows<T> {
    pub entities: Vec<T>,
    /// Строки, отброшенные из-за пустого ключа или порченых чисел
    pub skipped: usize,
}

// ===== Спецификации колонок =====

const WORKER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        field: "full_name",
        candidates: &["фио", "ф.и.о", "фамили", "сотрудник", "работник", "full name"],
        required: true,
    },
    ColumnSpec {
        field: "personnel_no",
        candidates: &["табельн", "таб", "personnel"],
        required: false,
    },
    ColumnSpec {
        field: "department",
        candidates: &["подраздел", "отдел", "цех", "department"],
        required: false,
    },
    ColumnSpec {
        field: "position",
        candidates: &["должност", "разряд", "профес", "position"],
        required: false,
    },
    ColumnSpec {
        field: "status",
        candidates: &["статус", "состояни", "status"],
        required: false,
    },
];

const JOB_TYPE_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        field: "name",
        candidates: &["наименование работ", "вид работ", "наимен", "работ", "name", "job"],
        required: true,
    },
    ColumnSpec {
        field: "unit",
        candidates: &["ед.", "ед. изм", "единиц", "unit"],
        required: true,
    },
    ColumnSpec {
        field: "price",
        candidates: &["цена", "расцен", "тариф", "price", "rate"],
        required: true,
    },
];

const PRODUCT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        field: "name",
        candidates: &["наимен", "издели", "product", "name"],
        required: true,
    },
    ColumnSpec {
        field: "product_no",
        candidates: &["заводск", "№", "номер", "number"],
        required: false,
    },
    ColumnSpec {
        field: "contract_code",
        candidates: &["контракт", "договор", "contract"],
        required: false,
    },
];

const CONTRACT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        field: "code",
        candidates: &["шифр", "код", "контракт", "договор", "code", "contract"],
        required: true,
    },
    ColumnSpec {
        field: "name",
        candidates: &["наимен", "назван", "name"],
        required: false,
    },
    ColumnSpec {
        field: "contract_type",
        candidates: &["тип", "вид", "type"],
        required: false,
    },
    ColumnSpec {
        field: "executor",
        candidates: &["исполнит", "executor"],
        required: false,
    },
    ColumnSpec {
        field: "igk",
        candidates: &["игк", "igk"],
        required: false,
    },
    ColumnSpec {
        field: "contract_number",
        candidates: &["номер догов", "№ догов", "номер", "number"],
        required: false,
    },
    ColumnSpec {
        field: "bank_account",
        candidates: &["счёт", "счет", "account"],
        required: false,
    },
    ColumnSpec {
        field: "start_date",
        candidates: &["дата начала", "начал", "срок с", "start"],
        required: false,
    },
    ColumnSpec {
        field: "end_date",
        candidates: &["дата оконч", "оконч", "срок по", "end"],
        required: false,
    },
    ColumnSpec {
        field: "description",
        candidates: &["примеч", "описан", "коммент", "description"],
        required: false,
    },
];

// ===== Вспомогательные =====

fn resolve_or_error(
    table: &RawTable,
    kind: TableKind,
    specs: &[ColumnSpec],
) -> ImportResult<Vec<Option<usize>>> {
    resolve_columns(&table.headers, specs)
        .map_err(|columns| ImportError::RequiredColumnsMissing { kind, columns })
}

fn cell<'a>(row: &'a [String], index: Option<usize>) -> &'a str {
    index
        .and_then(|i| row.get(i))
        .map(|s| s.trim())
        .unwrap_or("")
}

fn opt_cell(row: &[String], index: Option<usize>) -> Option<String> {
    let value = cell(row, index);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ===== Разборщики =====

/// Работники
pub fn parse_workers(table: &RawTable) -> ImportResult<ParsedRows<Worker>> {
    let cols = resolve_or_error(table, TableKind::Workers, WORKER_COLUMNS)?;
    let (c_name, c_tab, c_dept, c_pos, c_status) =
        (cols[0], cols[1], cols[2], cols[3], cols[4]);

    let mut entities = Vec::new();
    let mut skipped = 0usize;
    for row in &table.rows {
        let full_name = cell(row, c_name);
        if full_name.is_empty() {
            skipped += 1;
            continue;
        }
        entities.push(Worker {
            full_name: full_name.to_string(),
            personnel_no: opt_cell(row, c_tab),
            department: opt_cell(row, c_dept),
            position: opt_cell(row, c_pos),
            status: opt_cell(row, c_status),
        });
    }
    Ok(ParsedRows { entities, skipped })
}

/// Виды работ с расценками
pub fn parse_job_types(table: &RawTable) -> ImportResult<ParsedRows<JobType>> {
    let cols = resolve_or_error(table, TableKind::JobTypes, JOB_TYPE_COLUMNS)?;
    let (c_name, c_unit, c_price) = (cols[0], cols[1], cols[2]);

    let mut entities = Vec::new();
    let mut skipped = 0usize;
    for row in &table.rows {
        let name = cell(row, c_name);
        let price = normalize_number(cell(row, c_price));
        if name.is_empty() || price < 0.0 {
            skipped += 1;
            continue;
        }
        let unit = cell(row, c_unit);
        entities.push(JobType {
            name: name.to_string(),
            unit: if unit.is_empty() { "шт.".to_string() } else { unit.to_string() },
            price,
        });
    }
    Ok(ParsedRows { entities, skipped })
}

/// Изделия
pub fn parse_products(table: &RawTable) -> ImportResult<ParsedRows<Product>> {
    let cols = resolve_or_error(table, TableKind::Products, PRODUCT_COLUMNS)?;
    let (c_name, c_no, c_contract) = (cols[0], cols[1], cols[2]);

    let mut entities = Vec::new();
    let mut skipped = 0usize;
    for row in &table.rows {
        let name = cell(row, c_name);
        let product_no = opt_cell(row, c_no);
        // ключ — заводской номер, запасной — наименование
        if name.is_empty() && product_no.is_none() {
            skipped += 1;
            continue;
        }
        entities.push(Product {
            name: name.to_string(),
            product_no,
            contract_code: opt_cell(row, c_contract),
        });
    }
    Ok(ParsedRows { entities, skipped })
}

/// Контракты
pub fn parse_contracts(table: &RawTable) -> ImportResult<ParsedRows<Contract>> {
    let cols = resolve_or_error(table, TableKind::Contracts, CONTRACT_COLUMNS)?;

    let mut entities = Vec::new();
    let mut skipped = 0usize;
    for row in &table.rows {
        let code = cell(row, cols[0]);
        if code.is_empty() {
            skipped += 1;
            continue;
        }
        entities.push(Contract {
            code: code.to_string(),
            name: opt_cell(row, cols[1]),
            contract_type: opt_cell(row, cols[2]),
            executor: opt_cell(row, cols[3]),
            igk: opt_cell(row, cols[4]),
            contract_number: opt_cell(row, cols[5]),
            bank_account: opt_cell(row, cols[6]),
            start_date: normalize_date(cell(row, cols[7])),
            end_date: normalize_date(cell(row, cols[8])),
            description: opt_cell(row, cols[9]),
        });
    }
    Ok(ParsedRows { entities, skipped })
}
