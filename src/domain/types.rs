// ==========================================
// Доменные типы классификации импорта
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Вид таблицы, распознанный по заголовкам
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    /// Виды работ с расценками
    JobTypes,
    /// Изделия
    Products,
    /// Контракты / договоры
    Contracts,
    /// Работники
    Workers,
    /// Ведомость нарядов
    Orders,
    /// Не распознано
    Unknown,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::JobTypes => "Виды работ",
            TableKind::Products => "Изделия",
            TableKind::Contracts => "Контракты",
            TableKind::Workers => "Работники",
            TableKind::Orders => "Наряды",
            TableKind::Unknown => "Не распознано",
        };
        write!(f, "{}", name)
    }
}

/// Результат классификации одной сырой таблицы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedTable {
    pub kind: TableKind,
    /// Бинарная уверенность: 1 — сработало правило, 0 — нет
    pub confidence: u8,
    /// Индекс таблицы в исходном файле
    pub source_index: usize,
    /// Какие наборы маркеров сработали (для отчёта оператору)
    pub hints: Vec<String>,
}

/// Предустановка, сужающая план маршрутизации до подмножества видов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportPreset {
    /// Всё, что распозналось
    Auto,
    /// Только прейскурант (виды работ)
    Price,
    /// Только наряды
    Orders,
    /// Справочники: работники, изделия, контракты, виды работ
    Refs,
}

impl ImportPreset {
    /// Входит ли вид таблицы в предустановку
    pub fn accepts(&self, kind: TableKind) -> bool {
        match self {
            ImportPreset::Auto => kind != TableKind::Unknown,
            ImportPreset::Price => kind == TableKind::JobTypes,
            ImportPreset::Orders => kind == TableKind::Orders,
            ImportPreset::Refs => matches!(
                kind,
                TableKind::Workers
                    | TableKind::Products
                    | TableKind::Contracts
                    | TableKind::JobTypes
            ),
        }
    }
}

/// Итог upsert по одному виду сущностей
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertStats {
    pub added: usize,
    pub updated: usize,
}

impl UpsertStats {
    pub fn merge(&mut self, other: UpsertStats) {
        self.added += other.added;
        self.updated += other.updated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_refs_excludes_orders() {
        assert!(ImportPreset::Refs.accepts(TableKind::Workers));
        assert!(ImportPreset::Refs.accepts(TableKind::JobTypes));
        assert!(!ImportPreset::Refs.accepts(TableKind::Orders));
        assert!(!ImportPreset::Refs.accepts(TableKind::Unknown));
    }

    #[test]
    fn test_preset_auto_rejects_unknown() {
        assert!(!ImportPreset::Auto.accepts(TableKind::Unknown));
        assert!(ImportPreset::Auto.accepts(TableKind::Orders));
    }

    #[test]
    fn test_upsert_stats_merge() {
        let mut total = UpsertStats { added: 2, updated: 1 };
        total.merge(UpsertStats { added: 3, updated: 4 });
        assert_eq!(total, UpsertStats { added: 5, updated: 5 });
    }
}
