//! Configuration section schemas.

use parmenides_core::{EngineSettings, DEFAULT_DELIMITER, DEFAULT_SEPARATOR};
use parmenides_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Engine configuration.
///
/// # Example
///
/// ```toml
/// [engine]
/// delimiter = ";"
/// separator = "="
/// default_on_blank = true
/// json_content_types = ["application/x-ndjson"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Delimiter between array items and hash pairs.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Separator between a hash key and its value.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Substitute defaults for blank values as well as absent ones.
    #[serde(default)]
    pub default_on_blank: bool,

    /// Extra media types whose errors render as JSON.
    #[serde(default)]
    pub json_content_types: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            separator: default_separator(),
            default_on_blank: false,
            json_content_types: Vec::new(),
        }
    }
}

impl From<&EngineConfig> for EngineSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            delimiter: config.delimiter.clone(),
            separator: config.separator.clone(),
            default_on_blank: config.default_on_blank,
            json_content_types: config.json_content_types.clone(),
        }
    }
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (trace, debug, info, warn, error, or per-target).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub file_line_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            file_line_info: false,
        }
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            level: config.level.clone(),
            format: config.format,
            span_events: config.format == LogFormat::Pretty,
            file_line_info: config.file_line_info,
            ansi: config.ansi_enabled,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
