// ==========================================
// Локализация (i18n)
// ==========================================
// Библиотека rust-i18n
// Русский (по умолчанию) и английский
// ==========================================
// Замечание: макрос rust_i18n::i18n! инициализирован в lib.rs
// ==========================================

/// Текущая локаль
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Установить локаль ("ru" или "en")
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Перевод сообщения (без параметров)
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Перевод сообщения с параметрами
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
