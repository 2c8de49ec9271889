//! Declaration options.

use std::ops::RangeInclusive;

use regex::Regex;
use tracing::debug;

use crate::{
    coerce, Constraint, DeclarationError, EngineSettings, Matcher, Membership, ParamValue,
    TargetType, Transform, DEFAULT_DELIMITER,
};

/// Options attached to one parameter declaration.
///
/// Built with chained setters. Constraints are kept in the order they were
/// declared; declaring the same constraint twice replaces the earlier value
/// but keeps its position.
///
/// # Example
///
/// ```rust
/// use parmenides_core::{NamedTransform, ParamOptions};
///
/// let options = ParamOptions::new()
///     .required()
///     .blank(false)
///     .transform(NamedTransform::Upcase)
///     .in_set(["ASC", "DESC"]);
///
/// assert!(options.is_required());
/// assert_eq!(options.constraints().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamOptions {
    required: bool,
    default: Option<ParamValue>,
    transform: Option<Transform>,
    delimiter: Option<String>,
    separator: Option<String>,
    constraints: Vec<Constraint>,
}

impl ParamOptions {
    /// Creates an empty option record.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Rejects absent values.
    #[must_use]
    pub fn required(self) -> Self {
        self.required_if(true)
    }

    /// Sets `required` explicitly.
    #[must_use]
    pub fn required_if(mut self, required: bool) -> Self {
        self.required = required;
        self.constraint(Constraint::Required(required))
    }

    /// Value substituted when the coerced value is absent.
    ///
    /// Defaults are not coerced; they should already have the declared type.
    #[must_use]
    pub fn default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Operation applied to the value after coercion and defaulting.
    #[must_use]
    pub fn transform(mut self, transform: impl Into<Transform>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    /// Whether blank values are acceptable.
    #[must_use]
    pub fn blank(self, allowed: bool) -> Self {
        self.constraint(Constraint::Blank(allowed))
    }

    /// Requires the value to equal `value`.
    #[must_use]
    pub fn is(self, value: impl Into<ParamValue>) -> Self {
        self.constraint(Constraint::Is(Matcher::Value(value.into())))
    }

    /// Requires text values to contain a match for `pattern`.
    #[must_use]
    pub fn matches(self, pattern: Regex) -> Self {
        self.constraint(Constraint::Is(Matcher::Pattern(pattern)))
    }

    /// Requires the value to be one of `values`.
    #[must_use]
    pub fn in_set<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        self.constraint(Constraint::In(Membership::set(values)))
    }

    /// Requires the value to lie in the inclusive `range`.
    #[must_use]
    pub fn within<V: Into<ParamValue>>(self, range: RangeInclusive<V>) -> Self {
        let (start, end) = range.into_inner();
        self.constraint(Constraint::In(Membership::range(start, end)))
    }

    /// Synonym of [`ParamOptions::within`].
    #[must_use]
    pub fn range<V: Into<ParamValue>>(self, range: RangeInclusive<V>) -> Self {
        self.within(range)
    }

    /// Lower bound.
    #[must_use]
    pub fn min(self, bound: impl Into<ParamValue>) -> Self {
        self.constraint(Constraint::Min(bound.into()))
    }

    /// Upper bound.
    #[must_use]
    pub fn max(self, bound: impl Into<ParamValue>) -> Self {
        self.constraint(Constraint::Max(bound.into()))
    }

    /// Minimum length.
    #[must_use]
    pub fn min_length(self, length: usize) -> Self {
        self.constraint(Constraint::MinLength(length))
    }

    /// Maximum length.
    #[must_use]
    pub fn max_length(self, length: usize) -> Self {
        self.constraint(Constraint::MaxLength(length))
    }

    /// Delimiter for array items and hash pairs.
    ///
    /// An empty delimiter is ignored and the engine setting stays in effect.
    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            debug!("ignoring empty delimiter override");
        } else {
            self.delimiter = Some(delimiter);
        }
        self
    }

    /// Separator between hash keys and values.
    ///
    /// An empty separator is ignored and the engine setting stays in effect.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        if separator.is_empty() {
            debug!("ignoring empty separator override");
        } else {
            self.separator = Some(separator);
        }
        self
    }

    /// Adds a constraint, replacing an earlier one of the same kind in place.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        match self
            .constraints
            .iter_mut()
            .find(|existing| existing.kind() == constraint.kind())
        {
            Some(existing) => *existing = constraint,
            None => self.constraints.push(constraint),
        }
        self
    }

    /// Whether the declaration is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The configured default.
    #[must_use]
    pub fn default_value(&self) -> Option<&ParamValue> {
        self.default.as_ref()
    }

    /// The configured transform.
    #[must_use]
    pub fn transform_op(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    /// The delimiter override.
    #[must_use]
    pub fn delimiter_override(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }

    /// The separator override.
    #[must_use]
    pub fn separator_override(&self) -> Option<&str> {
        self.separator.as_deref()
    }

    /// Constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Builds options from textual key/value pairs.
    ///
    /// Values for `default`, `is`, `in`, `min` and `max` are coerced to
    /// `target`. `in` (also `within` and `range`) accepts `a..b` for ranges
    /// or a delimited list; `is` accepts `/pattern/`; `transform` accepts
    /// `name` or `name:argument`. Unknown keys are ignored.
    ///
    /// ```rust
    /// use parmenides_core::{ParamOptions, TargetType};
    ///
    /// let options = ParamOptions::from_pairs(
    ///     TargetType::Integer,
    ///     [("required", "true"), ("range", "1..10"), ("colour", "blue")],
    /// )
    /// .unwrap();
    ///
    /// assert!(options.is_required());
    /// assert_eq!(options.constraints().len(), 2);
    /// ```
    pub fn from_pairs<I, K, V>(target: TargetType, pairs: I) -> Result<Self, DeclarationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |options, (key, value)| {
                options.with_pair(target, key.as_ref(), value.as_ref())
            })
    }

    fn with_pair(self, target: TargetType, key: &str, value: &str) -> Result<Self, DeclarationError> {
        let options = match key {
            "required" => self.required_if(parse_flag(key, value)?),
            "blank" => {
                let allowed = parse_flag(key, value)?;
                self.blank(allowed)
            }
            "default" => {
                let default = self.coerce_option(target, key, value)?;
                self.default(default)
            }
            "transform" => {
                let (name, args) = match value.split_once(':') {
                    Some((name, arg)) => (name, vec![arg]),
                    None => (value, Vec::new()),
                };
                self.transform(Transform::from_name(name.trim(), &args)?)
            }
            "is" => match value.strip_prefix('/').and_then(|v| v.strip_suffix('/')) {
                Some(pattern) => self.matches(Regex::new(pattern)?),
                None => {
                    let expected = self.coerce_option(target, key, value)?;
                    self.is(expected)
                }
            },
            "in" | "within" | "range" => {
                let membership = match value.split_once("..") {
                    Some((start, end)) => Membership::range(
                        self.coerce_option(target, key, start.trim())?,
                        self.coerce_option(target, key, end.trim())?,
                    ),
                    None => {
                        let delimiter = self.delimiter_override().unwrap_or(DEFAULT_DELIMITER);
                        let values = value
                            .split(delimiter)
                            .map(|item| self.coerce_option(target, key, item.trim()))
                            .collect::<Result<Vec<_>, _>>()?;
                        Membership::Set(values)
                    }
                };
                self.constraint(Constraint::In(membership))
            }
            "min" => {
                let bound = self.coerce_option(target, key, value)?;
                self.min(bound)
            }
            "max" => {
                let bound = self.coerce_option(target, key, value)?;
                self.max(bound)
            }
            "min_length" => self.min_length(parse_length(key, value)?),
            "max_length" => self.max_length(parse_length(key, value)?),
            "delimiter" => self.delimiter(non_empty(key, value)?),
            "separator" => self.separator(non_empty(key, value)?),
            unknown => {
                debug!(option = unknown, "ignoring unknown parameter option");
                self
            }
        };
        Ok(options)
    }

    fn coerce_option(
        &self,
        target: TargetType,
        key: &str,
        value: &str,
    ) -> Result<ParamValue, DeclarationError> {
        let raw = ParamValue::from(value);
        coerce(Some(&raw), target, self, &EngineSettings::default())
            .ok()
            .flatten()
            .ok_or_else(|| DeclarationError::invalid_option(key, format!("expected {target}, got '{value}'")))
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, DeclarationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(DeclarationError::invalid_option(key, "expected boolean")),
    }
}

fn parse_length(key: &str, value: &str) -> Result<usize, DeclarationError> {
    value
        .trim()
        .parse()
        .map_err(|_| DeclarationError::invalid_option(key, "expected non-negative integer"))
}

fn non_empty<'v>(key: &str, value: &'v str) -> Result<&'v str, DeclarationError> {
    if value.is_empty() {
        Err(DeclarationError::invalid_option(key, "must not be empty"))
    } else {
        Ok(value)
    }
}
