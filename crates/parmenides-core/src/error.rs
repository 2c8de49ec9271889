//! Structured parameter errors.
//!
//! A [`ParamError`] is the only failure the engine produces while processing
//! a declaration. It names the violated [`ConstraintKind`] and keeps the
//! constraint's value so the entry point can render either a plain message
//! or a JSON payload.

use std::fmt;

use serde_json::{json, Value};
use thiserror::Error;

use crate::{Matcher, Membership, ParamValue, TargetType};

/// The constraint a [`ParamError`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Value must be present.
    Required,
    /// Value must not be blank.
    Blank,
    /// Value must match exactly, or be coercible to the declared type.
    Is,
    /// Value must be a member of a range or set.
    In,
    /// Value must not exceed an upper bound.
    Max,
    /// Value must not fall below a lower bound.
    Min,
    /// Value must be at least this long.
    MinLength,
    /// Value must be at most this long.
    MaxLength,
}

impl ConstraintKind {
    /// Message template; `%s` is replaced by the constraint value.
    #[must_use]
    pub fn template(self) -> &'static str {
        match self {
            Self::Required => "is required.",
            Self::Blank => "is blank.",
            Self::Is => "is not %s",
            Self::In => "not in %s",
            Self::Max => "more than %s",
            Self::Min => "less than %s",
            Self::MinLength => "length less than %s",
            Self::MaxLength => "length more than %s",
        }
    }

    /// Option key the constraint is declared with.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Blank => "blank",
            Self::Is => "is",
            Self::In => "in",
            Self::Max => "max",
            Self::Min => "min",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The constraint value attached to a [`ParamError`].
#[derive(Debug, Clone)]
pub enum ErrorDetail {
    /// A boolean option (`required`, `blank`).
    Flag(bool),
    /// The declared type a value could not be coerced to.
    Type(TargetType),
    /// The exact value or pattern of an `is` constraint.
    Matcher(Matcher),
    /// The range or set of an `in` constraint.
    Membership(Membership),
    /// The bound of a `min` or `max` constraint.
    Bound(ParamValue),
    /// The length of a `min_length` or `max_length` constraint.
    Length(usize),
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Type(target) => write!(f, "{target}"),
            Self::Matcher(matcher) => write!(f, "{matcher}"),
            Self::Membership(membership) => write!(f, "{membership}"),
            Self::Bound(bound) => write!(f, "{bound}"),
            Self::Length(length) => write!(f, "{length}"),
        }
    }
}

/// A failed coercion or constraint check.
///
/// # Example
///
/// ```rust
/// use parmenides_core::{ConstraintKind, ErrorDetail, ParamError, ParamValue};
///
/// let err = ParamError::new(ConstraintKind::Min, ErrorDetail::Bound(ParamValue::Integer(12)));
/// assert_eq!(err.message("arg"), "Parameter arg less than 12");
/// assert_eq!(err.to_hash("arg")["message"], "Parameter arg less than 12");
/// ```
#[derive(Debug, Clone)]
pub struct ParamError {
    kind: ConstraintKind,
    detail: ErrorDetail,
}

impl ParamError {
    /// Creates an error for `kind` with its constraint value.
    #[must_use]
    pub fn new(kind: ConstraintKind, detail: ErrorDetail) -> Self {
        Self { kind, detail }
    }

    /// Creates the `is` error reported when a value cannot become `target`.
    #[must_use]
    pub fn coercion(target: TargetType) -> Self {
        Self::new(ConstraintKind::Is, ErrorDetail::Type(target))
    }

    /// Returns the violated constraint.
    #[must_use]
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// Returns the constraint value.
    #[must_use]
    pub fn detail(&self) -> &ErrorDetail {
        &self.detail
    }

    /// The constraint message without the parameter name, e.g. `less than 12`.
    #[must_use]
    pub fn constraint_message(&self) -> String {
        self.kind
            .template()
            .replace("%s", &self.detail.to_string())
    }

    /// The full message for parameter `name`.
    #[must_use]
    pub fn message(&self, name: &str) -> String {
        format!("Parameter {name} {}", self.constraint_message())
    }

    /// The structured payload for parameter `name`: `{"message": ...}`.
    #[must_use]
    pub fn to_hash(&self, name: &str) -> Value {
        json!({ "message": self.message(name) })
    }

    /// Encodes [`ParamError::to_hash`] with `encoder`, or with
    /// [`DefaultJsonEncoder`] when none is given.
    #[must_use]
    pub fn to_json(&self, name: &str, encoder: Option<&dyn JsonEncoder>) -> String {
        let payload = self.to_hash(name);
        encoder.unwrap_or(&DefaultJsonEncoder).encode(&payload)
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.constraint_message())
    }
}

impl std::error::Error for ParamError {}

/// Serializes error payloads for JSON responses.
///
/// Hosts that need a particular JSON style (pretty output, envelopes, key
/// casing) supply their own encoder.
pub trait JsonEncoder {
    /// Encodes `value` as a JSON document.
    fn encode(&self, value: &Value) -> String;
}

/// Compact `serde_json` encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultJsonEncoder;

impl JsonEncoder for DefaultJsonEncoder {
    fn encode(&self, value: &Value) -> String {
        value.to_string()
    }
}

/// Errors raised while building a declaration from names and text.
///
/// These indicate a broken declaration, not a bad request, and are never
/// turned into 400 responses.
#[derive(Debug, Error)]
pub enum DeclarationError {
    /// The target type name is not one of the built-in types.
    #[error("unknown target type: {0}")]
    UnknownType(String),

    /// No transform is registered under this name.
    #[error("unknown transform: {0}")]
    UnknownTransform(String),

    /// An option value could not be interpreted.
    #[error("invalid value for option {key}: {reason}")]
    InvalidOption {
        /// The option key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A pattern constraint did not compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl DeclarationError {
    /// Creates an invalid option error.
    pub fn invalid_option(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
