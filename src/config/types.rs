use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub progress: ProgressConfig,
}

fn default_model() -> String {
    "gemini-3-flash-preview".into()
}

fn default_temperature() -> f64 {
    0.9
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            progress: ProgressConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Validation(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Validation("model must not be empty".into()));
        }
        self.progress.validate()
    }

    /// API key from config, falling back to the usual Gemini env vars.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Timing of the simulated progress indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Highest value simulated ticks may approach; must be below 100.
    #[serde(default = "default_ceiling")]
    pub ceiling: f64,
    /// How long 100% stays visible before returning to idle.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_tick_ms() -> u64 {
    400
}

fn default_ceiling() -> f64 {
    95.0
}

fn default_settle_ms() -> u64 {
    300
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            ceiling: default_ceiling(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl ProgressConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Validation(
                "progress.tick_ms must be positive".into(),
            ));
        }
        if !(self.ceiling > 0.0 && self.ceiling < 100.0) {
            return Err(ConfigError::Validation(format!(
                "progress.ceiling must be strictly between 0 and 100, got {}",
                self.ceiling
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.progress.tick_ms, 400);
        assert!((config.progress.ceiling - 95.0).abs() < f64::EPSILON);
        assert_eq!(config.progress.settle_ms, 300);
    }

    #[test]
    fn partial_progress_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[progress]\nceiling = 98.0\n").unwrap();
        assert!((config.progress.ceiling - 98.0).abs() < f64::EPSILON);
        assert_eq!(config.progress.tick_ms, 400);
    }

    #[test]
    fn ceiling_of_hundred_is_rejected() {
        let mut config = Config::default();
        config.progress.ceiling = 100.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("progress.ceiling"));
    }

    #[test]
    fn zero_tick_is_rejected() {
        let mut config = Config::default();
        config.progress.tick_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let config = Config {
            temperature: 2.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
