// ==========================================
// Интеграционные тесты потока нарядов
// ==========================================
// Ведомость (CSV / xlsx) -> восстановленные группы ->
// записанные наряды со строками и долями работников.
// ==========================================

mod test_helpers;

use naryad_import::{import_data, logging, ImportOptions, ImportOutput, ImportPreset};
use test_helpers::{count_rows, test_config, write_fixture};

const LEDGER_CSV: &str = "\
№ п/п;Наименование работ;Ед. изм.;Кол-во;Цена;Сумма
Ведомость нарядов за 2025 г.;;;;;
ФИО сотрудника: Иванов И.И., таб. № 101;;;;;
ФИО сотрудника: Петров П.П., таб. № 102;;;;;
Изделие № 55, 77;;;;;
16.06.;;;;;
Сварка швов;шт.;150;2;300
Зачистка;шт.;50;2;100
17.06.;;;;;
Окраска;м2;80;1;80
Итого;;;;;480
";

fn orders_only() -> ImportOptions {
    ImportOptions {
        dry_run: false,
        preset: ImportPreset::Orders,
        backup_before: false,
    }
}

#[test]
fn test_ledger_csv_committed_as_work_orders() {
    logging::init_test();
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let csv = write_fixture(&dir, "ledger.csv", LEDGER_CSV);

    let outcome = import_data(&config, &csv, &orders_only(), None).unwrap();
    let summary = match outcome {
        ImportOutput::Committed(summary) => summary,
        other => panic!("expected commit, got {:?}", other),
    };

    // две группы по два изделия — четыре наряда
    assert_eq!(count_rows(&config, "work_orders"), 4);
    // группа 16.06 несёт обе строки в каждом наряде, 17.06 — одну
    assert_eq!(count_rows(&config, "work_order_items"), 6);
    // справочники достроены из ведомости
    assert_eq!(count_rows(&config, "workers"), 2);
    assert_eq!(count_rows(&config, "products"), 2);
    assert_eq!(count_rows(&config, "contracts"), 1);
    assert_eq!(count_rows(&config, "job_types"), 3);
    // 2 работника + 2 изделия + 1 контракт + 3 вида работ + 4 наряда
    assert_eq!(summary.added, 12);
    assert_eq!(summary.updated, 0);

    let conn = rusqlite::Connection::open(&config.store_path).unwrap();

    // наряды без своего контракта получают контракт-заглушку
    let code: String = conn
        .query_row("SELECT code FROM contracts", [], |r| r.get(0))
        .unwrap();
    assert_eq!(code, "Без контракта");

    // даты групп разрешены годом из шапки ведомости
    let dates: Vec<String> = conn
        .prepare("SELECT DISTINCT order_date FROM work_orders ORDER BY order_date")
        .unwrap()
        .query_map([], |r| r.get(0))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-06-16", "2025-06-17"]);

    // доли каждого наряда в сумме дают его итог
    let mismatched: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM work_orders o
             WHERE ABS(o.total_amount -
                   (SELECT SUM(w.amount) FROM work_order_workers w
                    WHERE w.order_id = o.id)) > 0.005",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(mismatched, 0);

    // сумма наряда за 16.06 — обе строки целиком, без деления между изделиями
    let totals: Vec<f64> = conn
        .prepare("SELECT total_amount FROM work_orders WHERE order_date = '2025-06-16'")
        .unwrap()
        .query_map([], |r| r.get(0))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(totals, vec![400.0, 400.0]);
}

#[test]
fn test_ledger_reimport_appends_orders_but_updates_catalogs() {
    logging::init_test();
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let csv = write_fixture(&dir, "ledger.csv", LEDGER_CSV);

    import_data(&config, &csv, &orders_only(), None).unwrap();
    let second = import_data(&config, &csv, &orders_only(), None).unwrap();
    let summary = match second {
        ImportOutput::Committed(summary) => summary,
        other => panic!("expected commit, got {:?}", other),
    };

    // наряды создаются заново, справочники только обновляются
    assert_eq!(count_rows(&config, "work_orders"), 8);
    assert_eq!(count_rows(&config, "workers"), 2);
    assert_eq!(count_rows(&config, "job_types"), 3);
    assert_eq!(summary.added, 4);
    assert_eq!(summary.updated, 3);
}

#[test]
fn test_ledger_xlsx_banner_year_applied() {
    use rust_xlsxwriter::Workbook;

    logging::init_test();
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let path = dir.path().join("ledger.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["№", "Наименование работ", "Ед. изм.", "Кол-во", "Цена", "Сумма"]
        .iter()
        .enumerate()
    {
        sheet.write(0, col as u16, *header).unwrap();
    }
    sheet.write(1, 0, "Ведомость нарядов за 2024 г.").unwrap();
    sheet.write(2, 0, "ФИО сотрудника: Иванов И.И., таб. № 101").unwrap();
    sheet.write(3, 0, "16.06.").unwrap();
    sheet.write(4, 0, "Сварка").unwrap();
    sheet.write(4, 1, "шт.").unwrap();
    sheet.write(4, 2, 150.0).unwrap();
    sheet.write(4, 3, 1.0).unwrap();
    sheet.write(4, 4, 150.0).unwrap();
    sheet.write(5, 0, "Итого").unwrap();
    workbook.save(&path).unwrap();

    import_data(&config, &path, &orders_only(), None).unwrap();

    let conn = rusqlite::Connection::open(&config.store_path).unwrap();
    // год шапки листа (2024) сильнее опорного года конфигурации (2025)
    let date: String = conn
        .query_row("SELECT order_date FROM work_orders", [], |r| r.get(0))
        .unwrap();
    assert_eq!(date, "2024-06-16");
}

#[test]
fn test_ledger_dry_run_creates_no_store() {
    logging::init_test();
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let csv = write_fixture(&dir, "ledger.csv", LEDGER_CSV);

    let outcome = import_data(
        &config,
        &csv,
        &ImportOptions {
            dry_run: true,
            preset: ImportPreset::Orders,
            backup_before: false,
        },
        None,
    )
    .unwrap();

    let report = match outcome {
        ImportOutput::DryRun(report) => report,
        other => panic!("expected dry run, got {:?}", other),
    };
    // две группы ведомости видны в предпросмотре
    assert_eq!(report.added, 2);
    assert!(report.report_path.exists());
    // база в предпросмотре не открывается вовсе
    assert!(!config.store_path.exists());
}
