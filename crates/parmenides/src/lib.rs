//! # Parmenides
//!
//! Request parameter coercion and validation for the Themis Platform.
//!
//! Handlers declare the parameters they expect. Each declaration coerces the
//! raw input to a type, applies a default and a transform, checks the
//! declared constraints, and writes the normalized value back so the rest of
//! the handler reads typed values. The first failure rejects the request
//! with `400 Bad Request`.
//!
//! ## Crates
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | [`core`] | `parmenides-core` | Values, coercion, constraints, transforms, errors |
//! | [`extract`] | `parmenides-extract` | Parameter map, declaration context, rejections |
//! | [`config`] | `parmenides-config` | Layered TOML/JSON/env configuration |
//! | [`telemetry`] | `parmenides-telemetry` | `tracing` subscriber setup |
//!
//! ## Example
//!
//! ```rust
//! use parmenides::prelude::*;
//!
//! fn list_articles(query: &str) -> Result<ParamMap, Rejection> {
//!     let mut params = ParamMap::from_urlencoded(query).unwrap_or_default();
//!     let mut ctx = ParamContext::new(&mut params).with_content_type("application/json");
//!
//!     ctx.param("page", TargetType::Integer, &ParamOptions::new().default(1).min(1))?;
//!     ctx.param(
//!         "order",
//!         TargetType::String,
//!         &ParamOptions::new()
//!             .default("asc")
//!             .transform(NamedTransform::Upcase)
//!             .in_set(["ASC", "DESC"]),
//!     )?;
//!     ctx.param("tags", TargetType::Array, &ParamOptions::new().max_length(5))?;
//!
//!     Ok(params)
//! }
//!
//! let params = list_articles("tags=rust,http").unwrap();
//! assert_eq!(params.get("page"), Some(&ParamValue::Integer(1)));
//! assert_eq!(params.get("order"), Some(&ParamValue::from("ASC")));
//!
//! let rejection = list_articles("page=0").unwrap_err();
//! assert_eq!(rejection.body(), r#"{"message":"Parameter page less than 1"}"#);
//! ```

#![doc(html_root_url = "https://docs.rs/parmenides/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export engine types
pub use parmenides_core as core;

// Re-export request plumbing
pub use parmenides_extract as extract;

// Re-export configuration
pub use parmenides_config as config;

// Re-export logging setup
pub use parmenides_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use parmenides::prelude::*;
///
/// let options = ParamOptions::new().required().within(1..=10);
/// assert!(options.is_required());
/// ```
pub mod prelude {
    pub use parmenides_core::{
        blank, present, Constraint, ConstraintKind, EngineSettings, JsonEncoder, Matcher,
        Membership, NamedTransform, ParamError, ParamOptions, ParamValue, TargetType, Transform,
    };

    pub use parmenides_extract::{ParamContext, ParamMap, Rejection};

    pub use parmenides_config::{ConfigLoader, ParmenidesConfig};
}
