//! Layered configuration for Parmenides.
//!
//! This crate loads the engine's settings and logging setup with support
//! for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use parmenides_config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("parmenides.toml")?
//!     .with_dotenv()?
//!     .with_env_prefix("PARMENIDES")
//!     .load()?;
//!
//! parmenides_telemetry::init_logging(&config.log_config())?;
//! let settings = config.engine_settings();
//! # let _ = settings;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [engine]
//! delimiter = ","
//! separator = ":"
//! default_on_blank = false
//! json_content_types = ["application/x-ndjson"]
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY` variables:
//!
//! - `PARMENIDES__ENGINE__DELIMITER=;`
//! - `PARMENIDES__ENGINE__JSON_CONTENT_TYPES=application/x-ndjson,text/x-json`
//! - `PARMENIDES__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::ParmenidesConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{EngineConfig, LoggingConfig};
