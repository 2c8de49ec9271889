//! # Parmenides Extract
//!
//! Request-side plumbing for the Parmenides parameter engine.
//!
//! This crate connects the coercion and validation engine in
//! `parmenides-core` to an HTTP request:
//!
//! | Item | Description |
//! |------|-------------|
//! | [`ParamMap`] | Flat, mutable map of request parameters |
//! | [`ParamContext`] | Runs `param` and `one_of` declarations against a map |
//! | [`Rejection`] | `400 Bad Request` returned by a failed declaration |
//! | [`is_json_compatible`] | Decides whether errors render as JSON |
//!
//! ## Example
//!
//! ```rust
//! use parmenides_core::{ParamOptions, TargetType};
//! use parmenides_extract::{ParamContext, ParamMap, Rejection};
//!
//! fn search(query: &str) -> Result<String, Rejection> {
//!     let mut params = ParamMap::from_urlencoded(query).unwrap_or_default();
//!     let mut ctx = ParamContext::new(&mut params).with_content_type("text/plain");
//!
//!     ctx.param("q", TargetType::String, &ParamOptions::new().required())?;
//!     ctx.param("limit", TargetType::Integer, &ParamOptions::new().default(10).max(100))?;
//!
//!     Ok(format!("{:?}", ctx.params().get("limit")))
//! }
//!
//! assert!(search("q=rust").is_ok());
//!
//! let rejection = search("q=rust&limit=500").unwrap_err();
//! assert_eq!(rejection.body(), "Parameter limit more than 100");
//! ```
//!
//! ## Error Handling
//!
//! Declarations never panic and never return partially. A failure produces a
//! [`Rejection`] whose body is either `{"message": "..."}` or the bare
//! message, depending on the response content type. Values committed by
//! earlier declarations stay in the map.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod map;
mod negotiate;
mod rejection;

pub use context::ParamContext;
pub use map::ParamMap;
pub use negotiate::is_json_compatible;
pub use rejection::Rejection;
