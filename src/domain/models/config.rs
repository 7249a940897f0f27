use serde::{Deserialize, Serialize};

/// Main configuration structure for Sherlock
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Identifier signed into every case file
    #[serde(default = "default_investigator")]
    pub investigator: String,

    /// L-Score calculation configuration
    #[serde(default)]
    pub lscore: LScoreConfig,

    /// Retry-count to investigation-tier mapping
    #[serde(default)]
    pub escalation: EscalationConfig,

    /// Built-in verdict validator configuration
    #[serde(default)]
    pub verdict: VerdictConfig,

    /// Situational awareness limits
    #[serde(default)]
    pub awareness: AwarenessConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_investigator() -> String {
    "sherlock".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            investigator: default_investigator(),
            lscore: LScoreConfig::default(),
            escalation: EscalationConfig::default(),
            verdict: VerdictConfig::default(),
            awareness: AwarenessConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// L-Score calculation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LScoreConfig {
    /// Component value used when no execution signal applies (0.0-1.0)
    #[serde(default = "default_baseline")]
    pub baseline: f64,
}

const fn default_baseline() -> f64 {
    0.5
}

impl Default for LScoreConfig {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
        }
    }
}

/// Escalation policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EscalationConfig {
    /// Retry count at which investigations become elevated
    #[serde(default = "default_elevated_after")]
    pub elevated_after: u32,

    /// Retry count at which investigations become deep
    #[serde(default = "default_deep_after")]
    pub deep_after: u32,
}

const fn default_elevated_after() -> u32 {
    1
}

const fn default_deep_after() -> u32 {
    2
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            elevated_after: default_elevated_after(),
            deep_after: default_deep_after(),
        }
    }
}

/// Minimum verification pass rate per investigation tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VerdictConfig {
    #[serde(default = "default_routine_min_pass_rate")]
    pub routine_min_pass_rate: f64,

    #[serde(default = "default_elevated_min_pass_rate")]
    pub elevated_min_pass_rate: f64,

    #[serde(default = "default_deep_min_pass_rate")]
    pub deep_min_pass_rate: f64,
}

const fn default_routine_min_pass_rate() -> f64 {
    0.66
}

const fn default_elevated_min_pass_rate() -> f64 {
    0.8
}

const fn default_deep_min_pass_rate() -> f64 {
    1.0
}

impl Default for VerdictConfig {
    fn default() -> Self {
        Self {
            routine_min_pass_rate: default_routine_min_pass_rate(),
            elevated_min_pass_rate: default_elevated_min_pass_rate(),
            deep_min_pass_rate: default_deep_min_pass_rate(),
        }
    }
}

/// Situational awareness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AwarenessConfig {
    /// Maximum characters of a finding or decision preview
    #[serde(default = "default_max_preview_chars")]
    pub max_preview_chars: usize,

    /// Maximum aggregated decisions listed
    #[serde(default = "default_max_decisions")]
    pub max_decisions: usize,

    /// Maximum conflicting files listed
    #[serde(default = "default_max_conflicts")]
    pub max_conflicts: usize,

    /// Maximum touched files previewed per completed peer
    #[serde(default = "default_max_files_preview")]
    pub max_files_preview: usize,
}

const fn default_max_preview_chars() -> usize {
    80
}

const fn default_max_decisions() -> usize {
    10
}

const fn default_max_conflicts() -> usize {
    10
}

const fn default_max_files_preview() -> usize {
    5
}

impl Default for AwarenessConfig {
    fn default() -> Self {
        Self {
            max_preview_chars: default_max_preview_chars(),
            max_decisions: default_max_decisions(),
            max_conflicts: default_max_conflicts(),
            max_files_preview: default_max_files_preview(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Log file rotation: daily, hourly or never
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_log_rotation(),
        }
    }
}
