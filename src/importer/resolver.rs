// ==========================================
// План маршрутизации таблиц
// ==========================================
// Сводит пер-табличные классификации в план (вид, индекс),
// отбрасывая нераспознанное. Отдельное правило: файл из одной
// таблицы со следами списочного состава принудительно идёт
// в «Работники», даже если общий детектор его не распознал
// (у списков работников часто нет колонок ед.изм/цена).
// ==========================================

use crate::domain::types::{DetectedTable, ImportPreset, TableKind};
use crate::importer::detector::detect_table;
use crate::importer::raw_table::RawTable;
use tracing::debug;

/// Сколько первых строк просматривается на маркеры списочного состава
const ROSTER_SCAN_ROWS: usize = 5;

const ROSTER_NAME_MARKERS: &[&str] = &["фио", "ф.и.о", "full name"];
const ROSTER_PERSONNEL_MARKERS: &[&str] = &["табельн", "таб.", "personnel"];
const ROSTER_LIST_MARKERS: &[&str] = &[
    "список сотрудников",
    "список работников",
    "list of workers",
    "list of employees",
];

/// Классифицировать все таблицы файла
pub fn detect_all(tables: &[RawTable]) -> Vec<DetectedTable> {
    tables
        .iter()
        .enumerate()
        .map(|(index, table)| detect_table(table, index))
        .collect()
}

/// Построить план маршрутизации: (вид, индекс таблицы)
///
/// Нераспознанные таблицы выпадают из плана; порядок остальных
/// сохраняется. Для файла из единственной таблицы действует
/// принудительный маршрут списочного состава.
pub fn route(tables: &[RawTable]) -> Vec<(TableKind, usize)> {
    let detections = detect_all(tables);

    let mut plan: Vec<(TableKind, usize)> = Vec::new();
    for detection in &detections {
        if detection.kind != TableKind::Unknown {
            plan.push((detection.kind, detection.source_index));
        }
    }

    if plan.is_empty() && tables.len() == 1 && looks_like_worker_roster(&tables[0]) {
        debug!("одиночная таблица принудительно маршрутизирована как список работников");
        plan.push((TableKind::Workers, 0));
    }

    plan
}

/// Отфильтровать план по предустановке
pub fn apply_preset(
    plan: Vec<(TableKind, usize)>,
    preset: ImportPreset,
) -> Vec<(TableKind, usize)> {
    plan.into_iter()
        .filter(|(kind, _)| preset.accepts(*kind))
        .collect()
}

/// Следы списочного состава в заголовках или первых строках
fn looks_like_worker_roster(table: &RawTable) -> bool {
    let mut texts: Vec<String> = table
        .headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    for row in table.rows.iter().take(ROSTER_SCAN_ROWS) {
        texts.extend(row.iter().map(|c| c.trim().to_lowercase()));
    }

    let has_name = texts
        .iter()
        .any(|t| ROSTER_NAME_MARKERS.iter().any(|m| t.contains(m)));
    let has_personnel = texts
        .iter()
        .any(|t| ROSTER_PERSONNEL_MARKERS.iter().any(|m| t.contains(m)));
    let has_list_title = texts
        .iter()
        .any(|t| ROSTER_LIST_MARKERS.iter().any(|m| t.contains(m)));

    (has_name && has_personnel) || has_list_title
}
