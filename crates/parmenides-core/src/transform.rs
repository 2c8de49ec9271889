//! Post-coercion transforms.
//!
//! A [`Transform`] is either one of the registered [`NamedTransform`]s,
//! resolvable by name so declarations can come from configuration, or an
//! arbitrary function supplied by the host.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};

use crate::{DeclarationError, ParamError, ParamValue, TargetType};

type TransformFn = dyn Fn(ParamValue) -> Result<ParamValue, ParamError> + Send + Sync;

/// Registered transforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedTransform {
    /// Uppercases text.
    Upcase,
    /// Lowercases text.
    Downcase,
    /// Uppercases the first character and lowercases the rest.
    Capitalize,
    /// Trims surrounding whitespace.
    Strip,
    /// Trims leading whitespace.
    Lstrip,
    /// Trims trailing whitespace.
    Rstrip,
    /// Reverses text or array order.
    Reverse,
    /// Absolute value of a number.
    Abs,
    /// Converts any value to its text form.
    ToText,
    /// Formats a time, date or date-time with a strftime pattern.
    Strftime(String),
}

impl NamedTransform {
    /// Registered name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upcase => "upcase",
            Self::Downcase => "downcase",
            Self::Capitalize => "capitalize",
            Self::Strip => "strip",
            Self::Lstrip => "lstrip",
            Self::Rstrip => "rstrip",
            Self::Reverse => "reverse",
            Self::Abs => "abs",
            Self::ToText => "to_s",
            Self::Strftime(_) => "strftime",
        }
    }

    fn apply(&self, value: ParamValue) -> Result<ParamValue, ParamError> {
        match (self, value) {
            (Self::Upcase, ParamValue::Text(text)) => Ok(ParamValue::Text(text.to_uppercase())),
            (Self::Downcase, ParamValue::Text(text)) => Ok(ParamValue::Text(text.to_lowercase())),
            (Self::Capitalize, ParamValue::Text(text)) => Ok(ParamValue::Text(capitalize(&text))),
            (Self::Strip, ParamValue::Text(text)) => Ok(ParamValue::Text(text.trim().to_string())),
            (Self::Lstrip, ParamValue::Text(text)) => {
                Ok(ParamValue::Text(text.trim_start().to_string()))
            }
            (Self::Rstrip, ParamValue::Text(text)) => {
                Ok(ParamValue::Text(text.trim_end().to_string()))
            }
            (Self::Reverse, ParamValue::Text(text)) => {
                Ok(ParamValue::Text(text.chars().rev().collect()))
            }
            (Self::Reverse, ParamValue::Array(mut items)) => {
                items.reverse();
                Ok(ParamValue::Array(items))
            }
            (Self::Abs, ParamValue::Integer(n)) => n
                .checked_abs()
                .map(ParamValue::Integer)
                .ok_or_else(|| ParamError::coercion(TargetType::Integer)),
            (Self::Abs, ParamValue::Float(n)) => Ok(ParamValue::Float(n.abs())),
            (Self::ToText, value) => Ok(ParamValue::Text(value.to_text())),
            (Self::Strftime(format), ParamValue::Time(time)) => {
                strftime(format, |out, items| write!(out, "{}", time.format_with_items(items)))
            }
            (Self::Strftime(format), ParamValue::Date(date)) => {
                strftime(format, |out, items| write!(out, "{}", date.format_with_items(items)))
            }
            (Self::Strftime(format), ParamValue::DateTime(datetime)) => {
                strftime(format, |out, items| {
                    write!(out, "{}", datetime.format_with_items(items))
                })
            }
            (transform, _) => Err(ParamError::coercion(transform.input_type())),
        }
    }

    // Type reported when the transform is applied to an unsupported value.
    fn input_type(&self) -> TargetType {
        match self {
            Self::Abs => TargetType::Float,
            Self::Strftime(_) => TargetType::Time,
            _ => TargetType::String,
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// Formatting through `write!` turns invalid patterns into an error instead
// of a panic.
fn strftime<F>(format: &str, render: F) -> Result<ParamValue, ParamError>
where
    F: FnOnce(&mut String, StrftimeItems<'_>) -> fmt::Result,
{
    let mut out = String::new();
    render(&mut out, StrftimeItems::new(format))
        .map(|()| ParamValue::Text(out))
        .map_err(|_| ParamError::coercion(TargetType::String))
}

/// A transform applied after coercion and defaulting.
#[derive(Clone)]
pub enum Transform {
    /// A registered transform.
    Named(NamedTransform),
    /// A host-supplied function.
    Custom(Arc<TransformFn>),
}

impl Transform {
    /// Wraps a host function.
    ///
    /// ```rust
    /// use parmenides_core::{ParamValue, Transform};
    ///
    /// let double = Transform::custom(|value| match value {
    ///     ParamValue::Integer(n) => Ok(ParamValue::Integer(n * 2)),
    ///     other => Ok(other),
    /// });
    /// assert_eq!(double.apply(ParamValue::Integer(4)).unwrap(), ParamValue::Integer(8));
    /// ```
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(ParamValue) -> Result<ParamValue, ParamError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Resolves a registered transform by name.
    ///
    /// `strftime` takes the format as its single argument; every other
    /// transform takes none.
    pub fn from_name(name: &str, args: &[&str]) -> Result<Self, DeclarationError> {
        let named = match (name, args) {
            ("upcase", []) => NamedTransform::Upcase,
            ("downcase", []) => NamedTransform::Downcase,
            ("capitalize", []) => NamedTransform::Capitalize,
            ("strip", []) => NamedTransform::Strip,
            ("lstrip", []) => NamedTransform::Lstrip,
            ("rstrip", []) => NamedTransform::Rstrip,
            ("reverse", []) => NamedTransform::Reverse,
            ("abs", []) => NamedTransform::Abs,
            ("to_s" | "to_string", []) => NamedTransform::ToText,
            ("strftime", [format]) => {
                if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                    return Err(DeclarationError::invalid_option(
                        "transform",
                        format!("invalid strftime format '{format}'"),
                    ));
                }
                NamedTransform::Strftime((*format).to_string())
            }
            (
                "upcase" | "downcase" | "capitalize" | "strip" | "lstrip" | "rstrip" | "reverse"
                | "abs" | "to_s" | "to_string" | "strftime",
                _,
            ) => {
                return Err(DeclarationError::invalid_option(
                    "transform",
                    format!("wrong number of arguments for {name}"),
                ))
            }
            _ => return Err(DeclarationError::UnknownTransform(name.to_string())),
        };
        Ok(Self::Named(named))
    }

    /// Applies the transform.
    pub fn apply(&self, value: ParamValue) -> Result<ParamValue, ParamError> {
        match self {
            Self::Named(named) => named.apply(value),
            Self::Custom(f) => f(value),
        }
    }
}

impl From<NamedTransform> for Transform {
    fn from(named: NamedTransform) -> Self {
        Self::Named(named)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => f.debug_tuple("Named").field(named).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
