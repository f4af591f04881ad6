//! Configuration module
//!
//! Loaded from a TOML file, by default `~/.config/planner/config.toml`:
//!
//! ```toml
//! [billing]
//! late_penalty_rate = "0.02"
//! usage_ceiling_kwh = "2000"
//! due_day = 20
//!
//! [[billing.admin_fee_tiers]]
//! max_power_va = 900
//! fee = 2500
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```
//!
//! Every section and field is optional; missing values fall back to the
//! standard billing schedule.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::BillingPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Logging output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `planner=debug`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub billing: BillingPolicy,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.billing
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        match self.logging.format.to_lowercase().as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                other
            ))),
        }
    }
}

/// `~/.config/planner/config.toml`, or `./config.toml` without a config dir
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("planner"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("planner-config-{}-{}", std::process::id(), name))
            .join("config.toml")
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.billing.admin_fee(900), 2500);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_billing_section() {
        let config = AppConfig::from_toml(
            r#"
            [billing]
            late_penalty_rate = "0.03"
            due_day = 25

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.billing.late_penalty_rate, dec!(0.03));
        assert_eq!(config.billing.due_day, 25);
        assert_eq!(config.billing.usage_ceiling_kwh, dec!(2000));
        assert_eq!(config.billing.admin_fee(2201), 5000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = AppConfig::from_toml("[logging]\nformat = \"xml\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_invalid_billing_policy() {
        let err = AppConfig::from_toml("[billing]\ndue_day = 31").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = AppConfig::from_toml("[billing").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = AppConfig::load(&temp_path("missing")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("saved");
        let mut config = AppConfig::default();
        config.billing.admin_fee_above = 6000;
        config.logging.level = "debug".to_string();

        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn default_path_ends_with_planner_config() {
        let path = default_config_path();
        assert!(path.ends_with("config.toml"));
    }
}
