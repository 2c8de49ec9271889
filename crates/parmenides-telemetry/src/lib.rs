//! Logging setup for Parmenides.
//!
//! The engine crates emit `tracing` events and never install a subscriber.
//! Hosts that want the standard output call [`init_logging`] once at
//! startup:
//!
//! ```rust,ignore
//! use parmenides_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! ```
//!
//! Engine events are emitted through the exported macros
//! [`log_param_accepted!`], [`log_param_rejected!`] and
//! [`log_params_exclusive!`], which fix the field names `parameter`,
//! `target_type`, `constraint` and `parameters`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
