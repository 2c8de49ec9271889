//! Main configuration type.
//!
//! This module provides the top-level [`ParmenidesConfig`] struct.

use parmenides_core::EngineSettings;
use parmenides_telemetry::{create_env_filter, LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, EngineConfig, LoggingConfig};

/// Complete Parmenides configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from
/// files and environment variables.
///
/// # Example
///
/// ```
/// use parmenides_config::ParmenidesConfig;
///
/// let config = ParmenidesConfig::default();
/// assert_eq!(config.engine.delimiter, ",");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ParmenidesConfig {
    /// Coercion and rendering settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ParmenidesConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The delimiter or separator is empty
    /// - The delimiter and separator are equal
    /// - A JSON content type is not of the form `type/subtype`
    /// - The log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.delimiter.is_empty() {
            return Err(ConfigError::invalid_value(
                "engine.delimiter",
                "must not be empty",
            ));
        }

        if self.engine.separator.is_empty() {
            return Err(ConfigError::invalid_value(
                "engine.separator",
                "must not be empty",
            ));
        }

        // Hash pairs could not be split if both were the same
        if self.engine.delimiter == self.engine.separator {
            return Err(ConfigError::invalid_value(
                "engine.separator",
                format!("must differ from delimiter '{}'", self.engine.delimiter),
            ));
        }

        if let Some(media_type) = self
            .engine
            .json_content_types
            .iter()
            .find(|media_type| !is_media_type(media_type))
        {
            return Err(ConfigError::invalid_value(
                "engine.json_content_types",
                format!("invalid media type: {media_type}"),
            ));
        }

        if self.logging.enabled {
            create_env_filter(&self.logging.level).map_err(|e| {
                ConfigError::invalid_value("logging.level", e.to_string())
            })?;
        }

        Ok(())
    }

    /// Development preset: pretty debug logging.
    #[must_use]
    pub fn development() -> Self {
        Self {
            engine: EngineConfig::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                ansi_enabled: true,
                file_line_info: true,
                ..LoggingConfig::default()
            },
        }
    }

    /// Production preset: JSON logging at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Engine settings to hand to each request's declaration context.
    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings::from(&self.engine)
    }

    /// Logging configuration for `parmenides_telemetry::init_logging`.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig::from(&self.logging)
    }
}

fn is_media_type(candidate: &str) -> bool {
    matches!(
        candidate.trim().split_once('/'),
        Some((kind, subtype)) if !kind.is_empty() && !subtype.is_empty() && !subtype.contains('/')
    )
}
