// ==========================================
// Импорт производственных документов - ядро
// ==========================================
// Назначение: приём разнородных внешних файлов
// (таблицы, ведомости нарядов, справочники) и
// приведение их к каноническим записям в SQLite
// ==========================================

// Инициализация локализации
rust_i18n::i18n!("locales", fallback = "ru");

// ==========================================
// Объявление модулей
// ==========================================

// Доменный слой - сущности и типы
pub mod domain;

// Слой импорта - чтение, классификация, разбор
pub mod importer;

// Слой хранилища - доступ к данным
pub mod repository;

// API слой - точка входа импорта, отчёты, резервные копии
pub mod api;

// Конфигурация импорта
pub mod config;

// Инфраструктура БД (инициализация соединения / PRAGMA)
pub mod db;

// Логирование
pub mod logging;

// Локализация
pub mod i18n;

// ==========================================
// Реэкспорт основных типов
// ==========================================

// Доменные типы
pub use domain::types::{DetectedTable, ImportPreset, TableKind, UpsertStats};

// Доменные сущности
pub use domain::entities::{
    Contract, JobType, OrderGroup, OrderItem, OrderWorker, Product, Worker,
};

// Импорт
pub use importer::error::{ImportError, ImportResult};
pub use importer::raw_table::RawTable;
pub use importer::readers::{read_any_tabular, ReadOutcome, ReaderRegistry};

// API
pub use api::import_api::{
    import_data, DryRunReport, ImportOptions, ImportOutput, ImportSummary, ProgressFn,
};
pub use config::ImportConfig;

// ==========================================
// Константы
// ==========================================

// Версия системы
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Название системы
pub const APP_NAME: &str = "Импорт производственных документов";
