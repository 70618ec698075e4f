// ==========================================
// Классификация сырых таблиц
// ==========================================
// Эвристика по заголовкам с фиксированным порядком правил:
// наряды -> контракты -> виды работ -> изделия -> работники.
// Порядок — осознанный разрешитель конфликтов и менять его нельзя
// без пересмотра поведения (см. DESIGN.md).
// ==========================================

use crate::domain::types::{DetectedTable, TableKind};
use crate::importer::raw_table::RawTable;

// ===== Маркерные словари (подстроки, без регистра) =====

const NUMBER_MARKERS: &[&str] = &["№", "номер", " no", "no."];
const JOB_MARKERS: &[&str] = &["вид работ", "наименование работ", "работ", "операци", "job"];
const QTY_MARKERS: &[&str] = &["кол-во", "колич", "qty", "quantity"];
const PRICE_MARKERS: &[&str] = &["цена", "расцен", "тариф", "price", "rate"];
const AMOUNT_MARKERS: &[&str] = &["сумма", "стоимост", "amount"];

const CONTRACT_MARKERS: &[&str] = &["контракт", "договор", "шифр", "contract"];
const NAME_MARKERS: &[&str] = &["наимен", "назван", "name"];
const CONTRACT_ATTR_MARKERS: &[&str] = &["исполнит", "игк", "тип", "executor", "igk", "type"];

const UNIT_MARKERS: &[&str] = &["ед.", "ед. изм", "единиц", "unit"];

const PRODUCT_MARKERS: &[&str] = &["издели", "product", "item"];

const FULL_NAME_MARKERS: &[&str] = &["фио", "ф.и.о", "фамили", "сотрудник", "работник", "full name"];
const PERSONNEL_MARKERS: &[&str] = &["табельн", "таб.", "таб №", "personnel", "tab"];
const POSITION_MARKERS: &[&str] = &["должност", "разряд", "position", "rank", "профес"];

/// Есть ли среди нормализованных заголовков хоть один маркер набора
fn headers_contain(headers: &[String], markers: &[&str]) -> bool {
    headers
        .iter()
        .any(|h| markers.iter().any(|m| h.contains(m)))
}

/// Классифицировать одну сырую таблицу
///
/// Проверяет правила строго по одному разу, первое сработавшее
/// побеждает. Уверенность бинарная; сработавшие наборы маркеров
/// складываются в hints для отчёта оператору.
pub fn detect_table(table: &RawTable, source_index: usize) -> DetectedTable {
    let headers: Vec<String> = table
        .headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut hints = Vec::new();

    // Правило 1: наряды
    if headers_contain(&headers, NUMBER_MARKERS)
        && headers_contain(&headers, JOB_MARKERS)
        && headers_contain(&headers, QTY_MARKERS)
        && headers_contain(&headers, PRICE_MARKERS)
        && headers_contain(&headers, AMOUNT_MARKERS)
    {
        hints.push("номер+работы+кол-во+цена+сумма".to_string());
        return detected(TableKind::Orders, source_index, hints);
    }

    // Правило 2: контракты
    if headers_contain(&headers, CONTRACT_MARKERS)
        && (headers_contain(&headers, NAME_MARKERS)
            || headers_contain(&headers, CONTRACT_ATTR_MARKERS))
    {
        hints.push("контракт+наименование/атрибуты".to_string());
        return detected(TableKind::Contracts, source_index, hints);
    }

    // Правило 3: виды работ
    if (headers_contain(&headers, NAME_MARKERS) || headers_contain(&headers, JOB_MARKERS))
        && headers_contain(&headers, UNIT_MARKERS)
        && headers_contain(&headers, PRICE_MARKERS)
    {
        hints.push("наименование+ед.изм+цена".to_string());
        return detected(TableKind::JobTypes, source_index, hints);
    }

    // Правило 4: изделия
    if headers_contain(&headers, PRODUCT_MARKERS)
        && headers_contain(&headers, NUMBER_MARKERS)
        && headers_contain(&headers, CONTRACT_MARKERS)
    {
        hints.push("изделие+номер+контракт".to_string());
        return detected(TableKind::Products, source_index, hints);
    }

    // Правило 5: работники
    if headers_contain(&headers, FULL_NAME_MARKERS)
        && (headers_contain(&headers, PERSONNEL_MARKERS)
            || headers_contain(&headers, POSITION_MARKERS))
    {
        hints.push("фио+табельный/должность".to_string());
        return detected(TableKind::Workers, source_index, hints);
    }

    DetectedTable {
        kind: TableKind::Unknown,
        confidence: 0,
        source_index,
        hints,
    }
}

fn detected(kind: TableKind, source_index: usize, hints: Vec<String>) -> DetectedTable {
    DetectedTable {
        kind,
        confidence: 1,
        source_index,
        hints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str]) -> RawTable {
        RawTable::new(headers.iter().map(|s| s.to_string()).collect(), vec![])
    }

    #[test]
    fn test_detect_job_types() {
        let t = table(&["Наименование работ", "Ед. изм.", "Цена"]);
        let d = detect_table(&t, 0);
        assert_eq!(d.kind, TableKind::JobTypes);
        assert_eq!(d.confidence, 1);
        assert!(!d.hints.is_empty());
    }

    #[test]
    fn test_detect_workers() {
        let t = table(&["ФИО", "Табельный №", "Подразделение"]);
        assert_eq!(detect_table(&t, 0).kind, TableKind::Workers);
    }

    #[test]
    fn test_detect_workers_by_position() {
        let t = table(&["ФИО", "Должность"]);
        assert_eq!(detect_table(&t, 0).kind, TableKind::Workers);
    }

    #[test]
    fn test_detect_orders() {
        let t = table(&["№ наряда", "Вид работ", "Кол-во", "Цена", "Сумма"]);
        assert_eq!(detect_table(&t, 0).kind, TableKind::Orders);
    }

    #[test]
    fn test_detect_products() {
        let t = table(&["Изделие", "Заводской номер", "Договор поставки"]);
        // договор есть, но правило контрактов требует наименование/атрибуты;
        // «изделие» в заголовках его не удовлетворяет
        assert_eq!(detect_table(&t, 0).kind, TableKind::Products);
    }

    #[test]
    fn test_detect_contracts() {
        let t = table(&["Шифр контракта", "Наименование", "Исполнитель"]);
        assert_eq!(detect_table(&t, 0).kind, TableKind::Contracts);
    }

    #[test]
    fn test_tie_break_contracts_over_products() {
        // заголовки удовлетворяют обоим правилам — побеждают контракты
        let t = table(&["Изделие", "Номер", "Контракт", "Наименование"]);
        assert_eq!(detect_table(&t, 0).kind, TableKind::Contracts);
    }

    #[test]
    fn test_unknown_without_markers() {
        let t = table(&["Колонка 1", "Колонка 2"]);
        let d = detect_table(&t, 3);
        assert_eq!(d.kind, TableKind::Unknown);
        assert_eq!(d.confidence, 0);
        assert_eq!(d.source_index, 3);
    }
}
