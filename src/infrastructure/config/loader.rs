use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Investigator name cannot be empty")]
    EmptyInvestigator,

    #[error("Invalid L-Score baseline: {0}. Must be between 0.0 and 1.0")]
    InvalidBaseline(f64),

    #[error("Invalid {tier} pass rate: {value}. Must be between 0.0 and 1.0")]
    InvalidPassRate { tier: &'static str, value: f64 },

    #[error("Pass rates must not decrease as the investigation tier rises")]
    DecreasingPassRates,

    #[error("Invalid max_preview_chars: {0}. Must be at least 4")]
    InvalidPreviewChars(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .sherlock/config.yaml (project config)
    /// 3. .sherlock/local.yaml (project local overrides, optional)
    /// 4. Environment variables (SHERLOCK_* prefix, `__` separates nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".sherlock/config.yaml"))
            .merge(Yaml::file(".sherlock/local.yaml"))
            .merge(Env::prefixed("SHERLOCK_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("SHERLOCK_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.investigator.trim().is_empty() {
            return Err(ConfigError::EmptyInvestigator);
        }

        if !(0.0..=1.0).contains(&config.lscore.baseline) {
            return Err(ConfigError::InvalidBaseline(config.lscore.baseline));
        }

        let rates = [
            ("routine", config.verdict.routine_min_pass_rate),
            ("elevated", config.verdict.elevated_min_pass_rate),
            ("deep", config.verdict.deep_min_pass_rate),
        ];
        for (tier, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidPassRate { tier, value });
            }
        }
        if rates.windows(2).any(|w| w[1].1 < w[0].1) {
            return Err(ConfigError::DecreasingPassRates);
        }

        if config.awareness.max_preview_chars < 4 {
            return Err(ConfigError::InvalidPreviewChars(
                config.awareness.max_preview_chars,
            ));
        }
        if config.awareness.max_decisions == 0 || config.awareness.max_conflicts == 0 {
            return Err(ConfigError::ValidationFailed(
                "awareness caps must be at least 1".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}
