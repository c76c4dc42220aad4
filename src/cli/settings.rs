//! `set` / `unset` handling for the config file.

use std::fmt;

use crate::core::config::data::{
    shape_for_endpoint_name, Config, FULL_BOOK_ENDPOINT, LEGACY_ENDPOINT, SELECTED_TEXT_ENDPOINT,
};
use crate::core::endpoint::QueryMode;
use crate::utils::url::validate_endpoint_url;

pub const KEYS: [&str; 5] = [
    "book-id",
    "default-mode",
    "full-endpoint",
    "selected-endpoint",
    "legacy-endpoint",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    UnknownKey(String),
    InvalidValue { key: String, message: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownKey(key) => {
                write!(f, "Unknown config key: {key} (expected one of: {})", KEYS.join(", "))
            }
            SettingsError::InvalidValue { key, message } => {
                write!(f, "Invalid value for {key}: {message}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

fn endpoint_for_key(key: &str) -> Option<&'static str> {
    match key {
        "full-endpoint" => Some(FULL_BOOK_ENDPOINT),
        "selected-endpoint" => Some(SELECTED_TEXT_ENDPOINT),
        "legacy-endpoint" => Some(LEGACY_ENDPOINT),
        _ => None,
    }
}

fn invalid(key: &str, message: impl Into<String>) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Apply `key = value` to `config`, returning the confirmation line.
pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<String, SettingsError> {
    let value = value.trim();
    match key {
        "book-id" => {
            if value.is_empty() {
                return Err(invalid(key, "book id cannot be empty"));
            }
            config.book_id = Some(value.to_string());
        }
        "default-mode" => {
            let mode: QueryMode = value.parse().map_err(|e: String| invalid(key, e))?;
            config.default_mode = Some(mode);
        }
        _ => {
            let Some(name) = endpoint_for_key(key) else {
                return Err(SettingsError::UnknownKey(key.to_string()));
            };
            let url = validate_endpoint_url(value).map_err(|e| invalid(key, e))?;
            let Some(shape) = shape_for_endpoint_name(name) else {
                return Err(SettingsError::UnknownKey(key.to_string()));
            };
            config.set_endpoint(name, url, shape);
        }
    }
    Ok(format!("✅ Set {key} to: {value}"))
}

pub fn unset_value(config: &mut Config, key: &str) -> Result<String, SettingsError> {
    match key {
        "book-id" => config.book_id = None,
        "default-mode" => config.default_mode = None,
        _ => {
            let Some(name) = endpoint_for_key(key) else {
                return Err(SettingsError::UnknownKey(key.to_string()));
            };
            if !config.remove_endpoint(name) {
                return Ok(format!("ℹ️  {key} was not set"));
            }
        }
    }
    Ok(format!("✅ Unset {key}"))
}
