// ==========================================
// Канонические сущности
// ==========================================
// Транзитные DTO между разборщиками и слоем хранилища.
// Долговечные строки живут в SQLite (repository::schema).
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Работник
///
/// Естественный ключ: табельный номер, при его отсутствии — ФИО
/// (сравнение без учёта регистра).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub full_name: String,
    pub personnel_no: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub status: Option<String>,
}

/// Вид работ с расценкой
///
/// Естественный ключ: наименование.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobType {
    pub name: String,
    pub unit: String,
    /// Расценка за единицу, неотрицательная
    pub price: f64,
}

/// Изделие
///
/// Естественный ключ: заводской номер, при его отсутствии — наименование.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub product_no: Option<String>,
    pub contract_code: Option<String>,
}

/// Контракт
///
/// Естественный ключ: шифр.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub code: String,
    pub name: Option<String>,
    pub contract_type: Option<String>,
    pub executor: Option<String>,
    pub igk: Option<String>,
    pub contract_number: Option<String>,
    pub bank_account: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Строка наряда
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub job_name: String,
    pub unit: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub amount: f64,
}

/// Работник, привязанный к наряду
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWorker {
    pub full_name: String,
    pub personnel_no: Option<String>,
}

/// Восстановленная группа наряда
///
/// Одна дата ведомости: строки работ, список изделий и работников.
/// Потребляется стадией записи; группы без строк отбрасываются.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderGroup {
    pub date: NaiveDate,
    pub products: Vec<String>,
    pub items: Vec<OrderItem>,
    pub workers: Vec<OrderWorker>,
}

impl OrderGroup {
    /// Общая сумма наряда по строкам
    pub fn total_amount(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_group_total() {
        let group = OrderGroup {
            date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            products: vec!["101".to_string()],
            items: vec![
                OrderItem {
                    job_name: "Сварка".to_string(),
                    unit: "шт.".to_string(),
                    unit_price: 150.0,
                    quantity: 4.0,
                    amount: 600.0,
                },
                OrderItem {
                    job_name: "Окраска".to_string(),
                    unit: "м2".to_string(),
                    unit_price: 80.0,
                    quantity: 2.0,
                    amount: 160.0,
                },
            ],
            workers: vec![],
        };
        assert!((group.total_amount() - 760.0).abs() < f64::EPSILON);
    }
}
