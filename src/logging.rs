// ==========================================
// Инициализация логирования
// ==========================================
// tracing + tracing-subscriber
// Уровень задаётся переменной окружения
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Инициализация логирования
///
/// # Переменные окружения
/// - RUST_LOG: фильтр уровня (по умолчанию: info)
///   например: RUST_LOG=debug или RUST_LOG=naryad_import=trace
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Инициализация логирования для тестов
///
/// Более подробный уровень, вывод в тестовый writer
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
