//! Advisor configuration parsed from environment variables.

use crate::error::ErrorCode;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8787/";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_CATALOG_SOURCE: &str = "products.json";
pub const DEFAULT_STORE_PATH: &str = ".routine-advisor/storage.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value failed validation.
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "E_CONFIG_INVALID",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    /// Chat proxy URL; requests are POSTed to it verbatim.
    pub endpoint: String,
    /// Model identifier sent with every chat request.
    pub model: String,
    /// Catalog location: an `http(s)://` URL or a local file path.
    pub catalog_source: String,
    /// Path of the JSON key-value file holding the selection.
    pub store_path: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            catalog_source: DEFAULT_CATALOG_SOURCE.to_string(),
            store_path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

impl AdvisorConfig {
    /// Build typed advisor config from environment variables.
    ///
    /// All optional:
    /// - `ADVISOR_ENDPOINT`: chat proxy URL
    /// - `ADVISOR_MODEL`: default `gpt-4o`
    /// - `ADVISOR_CATALOG`: default `products.json`
    /// - `ADVISOR_STORE_PATH`: default `.routine-advisor/storage.json`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a supplied value fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`AdvisorConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a supplied value fails validation.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let read = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        let config = Self {
            endpoint: read("ADVISOR_ENDPOINT", defaults.endpoint),
            model: read("ADVISOR_MODEL", defaults.model),
            catalog_source: read("ADVISOR_CATALOG", defaults.catalog_source),
            store_path: read("ADVISOR_STORE_PATH", defaults.store_path),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that both env parsing and CLI overrides must satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a non-HTTP endpoint or a blank model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.endpoint) {
            return Err(ConfigError::Invalid {
                key: "ADVISOR_ENDPOINT",
                reason: format!("expected an http(s) URL, got '{}'", self.endpoint),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid { key: "ADVISOR_MODEL", reason: "must not be empty".into() });
        }
        if self.store_path.trim().is_empty() {
            return Err(ConfigError::Invalid { key: "ADVISOR_STORE_PATH", reason: "must not be empty".into() });
        }
        Ok(())
    }
}

pub(crate) fn is_http_url(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
