//! Configuration management for SirCLI
//!
//! Settings live in a single JSON document addressed by dotted key paths:
//! 1. `SIRCLI_CONFIG` environment variable (explicit file path)
//! 2. `<config_dir>/sircli/config.json`

pub mod models;
pub mod settings;

use std::path::PathBuf;

use serde_json::Value;

pub use self::{models::ProviderKind, settings::ConfigStore};

/// Substrings that mark a key path as holding a secret
const SENSITIVE_KEYS: &[&str] = &["key", "token", "secret", "password", "api"];

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "SIRCLI_CONFIG";

/// Configuration locations
pub struct Config;

impl Config {
    /// Get the configuration directory path
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sircli")
    }

    /// Get the config file path
    #[must_use]
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .filter(|p| !p.is_empty())
            .map_or_else(|| Self::config_dir().join("config.json"), PathBuf::from)
    }
}

/// Whether a dotted key path names a secret
#[must_use]
pub fn is_sensitive(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEYS.iter().any(|needle| key.contains(needle))
}

/// Mask a string value for display when its key path names a secret
///
/// Keeps the first and last four characters, or shows `****` for values of
/// eight characters or fewer.
#[must_use]
pub fn mask_sensitive(key: &str, value: &str) -> String {
    if !is_sensitive(key) {
        return value.to_string();
    }

    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

/// Render a stored value for display, masking secret strings
#[must_use]
pub fn display_value(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) => mask_sensitive(key, s),
        other => other.to_string(),
    }
}
