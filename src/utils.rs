use std::env::var;
use std::str::FromStr;

/// Get the value of ENV var, or a default
///
/// Only when:
/// - It is set
/// - It is not empty
pub fn env_var_or_else(var_name: &'static str, or_else: fn() -> String) -> String {
    if let Ok(value) = var(var_name) {
        if !value.is_empty() {
            return value;
        }
    }

    or_else()
}

/// Get the parsed value of ENV var, or a default
///
/// The default is also used when the value does not parse
pub fn env_var_parse_or<T: FromStr>(var_name: &'static str, default: T) -> T {
    match var(var_name) {
        Ok(value) => value.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
