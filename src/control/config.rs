//! Configuration loading for the control module.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ui::FormVariant;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "MOTOR_PANEL_CONFIG";
/// Config file looked up in the working directory when no override is set.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Configuration for connecting to the motor service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ControlConfig {
    /// Base URL of the motor service (without endpoint path)
    pub base_url: String,
    /// Status poll period in milliseconds
    pub poll_interval_ms: u64,
    /// Optional per-request timeout; requests never time out when unset
    pub request_timeout_ms: Option<u64>,
    /// Form variant mounted at start-up, skipping the selector screen
    pub form_variant: Option<FormVariant>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            poll_interval_ms: 1000,
            request_timeout_ms: None,
            form_variant: None,
        }
    }
}

impl ControlConfig {
    /// Load configuration from a TOML file.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }

    /// Parse configuration from TOML text. Missing keys fall back to defaults.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut config: ControlConfig = toml::from_str(content)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        anyhow::ensure!(!config.base_url.is_empty(), "base-url must not be empty");
        anyhow::ensure!(config.poll_interval_ms > 0, "poll-interval-ms must be greater than zero");
        Ok(config)
    }

    /// Load the config file if it exists, otherwise use defaults.
    pub fn load_or_default(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            log::info!("Loading configuration from {}", config_path.display());
            Self::load(config_path)
        } else {
            log::info!("No config file at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Resolve the config file path from the environment.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Full URL of an endpoint path such as `/quickstop`.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ControlConfig::parse("").unwrap();
        assert_eq!(config, ControlConfig::default());
        assert_eq!(config.endpoint_url("/motor_status"), "http://localhost:5000/motor_status");
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_full_config() {
        let content = r#"
            base-url = "http://10.10.192.80:5000/"
            poll-interval-ms = 250
            request-timeout-ms = 3000
            form-variant = "absolute-relative"
        "#;
        let config = ControlConfig::parse(content).unwrap();
        assert_eq!(config.base_url, "http://10.10.192.80:5000");
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.form_variant, Some(FormVariant::AbsoluteRelative));
        assert_eq!(config.endpoint_url("/quickstop"), "http://10.10.192.80:5000/quickstop");
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        assert!(ControlConfig::parse("poll-interval-ms = 0").is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(ControlConfig::parse("api-key = \"secret\"").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("motor-command-panel-does-not-exist.toml");
        let config = ControlConfig::load_or_default(&path).unwrap();
        assert_eq!(config, ControlConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("motor-command-panel-{}.toml", std::process::id()));
        std::fs::write(&path, "form-variant = \"send-command\"\n").unwrap();
        let config = ControlConfig::load_or_default(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.form_variant, Some(FormVariant::SendCommand));
    }
}
