// ==========================================
// API слой
// ==========================================
// Точка входа импорта, отчёты, резервные копии.
// ==========================================

pub mod backup;
pub mod import_api;
pub mod report;

pub use backup::snapshot;
pub use import_api::{import_data, DryRunReport, ImportOptions, ImportOutput, ImportSummary};
pub use report::write_html_report;
