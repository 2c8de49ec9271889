//! # Parmenides Core
//!
//! The coercion and constraint engine behind Parmenides parameter
//! declarations.
//!
//! This crate knows nothing about HTTP. It turns raw request values into
//! typed [`ParamValue`]s, applies [`Transform`]s, and checks the result
//! against the [`Constraint`]s collected in a [`ParamOptions`] record. Every
//! failure is reported as a single [`ParamError`] carrying the violated
//! [`ConstraintKind`] and the constraint's value.
//!
//! ## Target Types
//!
//! | [`TargetType`] | Produces | Raw input |
//! |----------------|----------|-----------|
//! | `Integer` | [`ParamValue::Integer`] | `"42"`, `"-7"`, `"0x1f"` |
//! | `Float` | [`ParamValue::Float`] | `"1.5"`, `"2e3"` |
//! | `String` | [`ParamValue::Text`] | anything |
//! | `Time` | [`ParamValue::Time`] | `"2014-01-20T10:00:00+01:00"` |
//! | `Date` | [`ParamValue::Date`] | `"2014-01-20"`, `"20 Jan 2014"` |
//! | `DateTime` | [`ParamValue::DateTime`] | `"2014-01-20 10:00:00"` |
//! | `Array` | [`ParamValue::Array`] | `"a,b,c"` |
//! | `Hash` | [`ParamValue::Hash`] | `"a:1,b:2"` |
//! | `Boolean` | [`ParamValue::Boolean`] | `"yes"`, `"f"`, `"1"` |
//! | `Opaque` | [`ParamValue::Opaque`] | already-typed host values only |
//!
//! ## Example
//!
//! ```rust
//! use parmenides_core::{coerce, validate, EngineSettings, ParamOptions, ParamValue, TargetType};
//!
//! let options = ParamOptions::new().required().within(1..=10);
//! let settings = EngineSettings::default();
//!
//! let raw = ParamValue::from("7");
//! let value = coerce(Some(&raw), TargetType::Integer, &options, &settings).unwrap();
//! assert_eq!(value, Some(ParamValue::Integer(7)));
//! assert!(validate(value.as_ref(), &options).is_ok());
//!
//! let err = validate(Some(&ParamValue::Integer(11)), &options).unwrap_err();
//! assert_eq!(err.message("page"), "Parameter page not in 1..10");
//! ```

#![doc(html_root_url = "https://docs.rs/parmenides-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod coerce;
mod constraint;
mod error;
mod options;
mod predicate;
mod settings;
pub mod temporal;
mod transform;
mod value;

pub use coerce::coerce;
pub use constraint::{validate, Constraint, Matcher, Membership};
pub use error::{ConstraintKind, DeclarationError, DefaultJsonEncoder, ErrorDetail, JsonEncoder, ParamError};
pub use options::ParamOptions;
pub use predicate::{blank, present};
pub use settings::{EngineSettings, DEFAULT_DELIMITER, DEFAULT_SEPARATOR};
pub use transform::{NamedTransform, Transform};
pub use value::{Opaque, OpaqueType, ParamValue, TargetType};
