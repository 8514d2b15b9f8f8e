// Configuration module
// Named defaults for the response writer, file delivery and logging

use crate::http::DispositionType;
use crate::response::options::{
    DEFAULT_DISPOSITION, DEFAULT_JSONP_CALLBACK, DEFAULT_REDIRECT_STATUS,
};
use serde::{Deserialize, Serialize};

/// Default configuration file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "resfmt";

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub response: ResponseConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults used by the response writer
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ResponseConfig {
    /// Callback name used by `jsonp` when the caller gives none
    pub jsonp_callback: String,
    /// Status used by `redirect` when the caller gives none
    pub redirect_status: u16,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            jsonp_callback: DEFAULT_JSONP_CALLBACK.to_string(),
            redirect_status: DEFAULT_REDIRECT_STATUS,
        }
    }
}

/// File delivery configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// Read buffer size in bytes
    pub chunk_size: usize,
    /// Disposition used by `attachment` when the caller gives none
    pub disposition: DispositionType,
    /// Include path, errno and syscall in 503 bodies
    pub expose_error_details: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
            disposition: DEFAULT_DISPOSITION,
            expose_error_details: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Emit one line per finished file delivery
    pub delivery_log: bool,
    /// Delivery log format (common or json)
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Info/delivery log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_log_format() -> String {
    "common".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            delivery_log: false,
            log_format: default_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from `resfmt.{toml,json,yaml,...}` in the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. Environment variables prefixed with `RESFMT_`
    /// override file values, with `__` separating sections
    /// (`RESFMT_RESPONSE__JSONP_CALLBACK=cb`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("RESFMT").separator("__"))
            .set_default("response.jsonp_callback", DEFAULT_JSONP_CALLBACK)?
            .set_default("response.redirect_status", i64::from(DEFAULT_REDIRECT_STATUS))?
            .set_default("delivery.chunk_size", 65_536)?
            .set_default("delivery.disposition", DEFAULT_DISPOSITION.as_str())?
            .set_default("delivery.expose_error_details", true)?
            .set_default("logging.delivery_log", false)?
            .set_default("logging.log_format", "common")?
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = Config::load_from("definitely/not/here/resfmt").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.response.jsonp_callback, "callback");
        assert_eq!(cfg.response.redirect_status, 302);
        assert_eq!(cfg.delivery.chunk_size, 65_536);
        assert!(!cfg.logging.delivery_log);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resfmt.toml");
        fs::write(
            &path,
            r#"
[response]
jsonp_callback = "handle"

[delivery]
disposition = "inline"
expose_error_details = false
"#,
        )
        .unwrap();

        let base = dir.path().join("resfmt");
        let cfg = Config::load_from(base.to_str().unwrap()).unwrap();
        assert_eq!(cfg.response.jsonp_callback, "handle");
        assert_eq!(cfg.response.redirect_status, 302);
        assert_eq!(cfg.delivery.disposition, DispositionType::Inline);
        assert!(!cfg.delivery.expose_error_details);
        assert_eq!(cfg.logging.log_format, "common");
    }
}
