//! Declarative constraints and the validator that evaluates them.
//!
//! Constraints are checked in the order they were declared and the first
//! violation is returned. Apart from that stopping rule they are independent
//! of each other. `min`, `max`, `in` and the length constraints are
//! vacuously satisfied by absent values; `required` and `blank` are the
//! constraints that reject absence.

use std::fmt;

use regex::Regex;

use crate::{ConstraintKind, ErrorDetail, ParamError, ParamOptions, ParamValue};

/// Exact value or pattern for an `is` constraint.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// The value must equal this one.
    Value(ParamValue),
    /// Text values must contain a match for this pattern.
    Pattern(Regex),
}

impl Matcher {
    /// Returns `true` if `value` satisfies the matcher.
    #[must_use]
    pub fn matches(&self, value: &ParamValue) -> bool {
        match self {
            Self::Value(expected) => expected == value,
            Self::Pattern(pattern) => value.as_str().is_some_and(|text| pattern.is_match(text)),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

/// Allowed values for an `in` constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Membership {
    /// Inclusive range.
    Range {
        /// Lowest allowed value.
        start: ParamValue,
        /// Highest allowed value.
        end: ParamValue,
    },
    /// Explicit list of allowed values.
    Set(Vec<ParamValue>),
}

impl Membership {
    /// Builds an inclusive range.
    pub fn range(start: impl Into<ParamValue>, end: impl Into<ParamValue>) -> Self {
        Self::Range {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Builds an explicit set.
    pub fn set<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        Self::Set(values.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if `value` is a member.
    #[must_use]
    pub fn contains(&self, value: &ParamValue) -> bool {
        match self {
            Self::Range { start, end } => {
                start.compare(value).is_some_and(|o| o.is_le())
                    && end.compare(value).is_some_and(|o| o.is_ge())
            }
            Self::Set(values) => values.iter().any(|allowed| allowed == value),
        }
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { start, end } => write!(f, "{start}..{end}"),
            Self::Set(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    value.fmt_inspect(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A single declared constraint.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Fails on absent values when `true`.
    Required(bool),
    /// Whether blank values are acceptable; fails on blank values when `false`.
    Blank(bool),
    /// Fails unless the value matches.
    Is(Matcher),
    /// Fails unless the value is absent or a member.
    In(Membership),
    /// Fails unless the value is absent or not below the bound.
    Min(ParamValue),
    /// Fails unless the value is absent or not above the bound.
    Max(ParamValue),
    /// Fails unless the value is absent or at least this long.
    MinLength(usize),
    /// Fails unless the value is absent or at most this long.
    MaxLength(usize),
}

impl Constraint {
    /// The kind reported when this constraint fails.
    #[must_use]
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Self::Required(_) => ConstraintKind::Required,
            Self::Blank(_) => ConstraintKind::Blank,
            Self::Is(_) => ConstraintKind::Is,
            Self::In(_) => ConstraintKind::In,
            Self::Min(_) => ConstraintKind::Min,
            Self::Max(_) => ConstraintKind::Max,
            Self::MinLength(_) => ConstraintKind::MinLength,
            Self::MaxLength(_) => ConstraintKind::MaxLength,
        }
    }

    /// Checks `value` against this constraint.
    pub fn check(&self, value: Option<&ParamValue>) -> Result<(), ParamError> {
        let satisfied = match (self, value) {
            (Self::Required(required), value) => !(*required && value.is_none()),
            (Self::Blank(allowed), value) => *allowed || !is_blank(value),
            (Self::Is(matcher), Some(value)) => matcher.matches(value),
            (Self::Is(_), None) => false,
            (_, None) => true,
            (Self::In(membership), Some(value)) => membership.contains(value),
            (Self::Min(bound), Some(value)) => bound.compare(value).is_some_and(|o| o.is_le()),
            (Self::Max(bound), Some(value)) => bound.compare(value).is_some_and(|o| o.is_ge()),
            (Self::MinLength(length), Some(value)) => *length <= value.length(),
            (Self::MaxLength(length), Some(value)) => *length >= value.length(),
        };

        if satisfied {
            Ok(())
        } else {
            Err(self.violation())
        }
    }

    fn violation(&self) -> ParamError {
        let detail = match self {
            Self::Required(flag) | Self::Blank(flag) => ErrorDetail::Flag(*flag),
            Self::Is(matcher) => ErrorDetail::Matcher(matcher.clone()),
            Self::In(membership) => ErrorDetail::Membership(membership.clone()),
            Self::Min(bound) | Self::Max(bound) => ErrorDetail::Bound(bound.clone()),
            Self::MinLength(length) | Self::MaxLength(length) => ErrorDetail::Length(*length),
        };
        ParamError::new(self.kind(), detail)
    }
}

// Text counts as blank when it has no non-whitespace character.
fn is_blank(value: Option<&ParamValue>) -> bool {
    match value {
        Some(ParamValue::Text(text)) => text.trim().is_empty(),
        other => crate::blank(other),
    }
}

/// Checks `value` against every constraint in `options`, in declaration
/// order, and returns the first violation.
///
/// ```rust
/// use parmenides_core::{validate, ConstraintKind, ParamOptions, ParamValue};
///
/// let options = ParamOptions::new().min(12).max(20);
/// let err = validate(Some(&ParamValue::Integer(7)), &options).unwrap_err();
/// assert_eq!(err.kind(), ConstraintKind::Min);
///
/// // Absent optional values satisfy ordering constraints.
/// assert!(validate(None, &options).is_ok());
/// ```
pub fn validate(value: Option<&ParamValue>, options: &ParamOptions) -> Result<(), ParamError> {
    options
        .constraints()
        .iter()
        .try_for_each(|constraint| constraint.check(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn text(s: &str) -> ParamValue {
        ParamValue::from(s)
    }

    #[test]
    fn test_required() {
        assert!(Constraint::Required(true).check(None).is_err());
        assert!(Constraint::Required(true).check(Some(&ParamValue::Boolean(false))).is_ok());
        assert!(Constraint::Required(false).check(None).is_ok());
    }

    #[test]
    fn test_blank_text_is_whitespace_aware() {
        let constraint = Constraint::Blank(false);
        assert!(constraint.check(Some(&text("   "))).is_err());
        assert!(constraint.check(Some(&text(""))).is_err());
        assert!(constraint.check(Some(&text(" a "))).is_ok());
        assert!(Constraint::Blank(true).check(Some(&text(""))).is_ok());
    }

    #[test]
    fn test_blank_collections_and_others() {
        let constraint = Constraint::Blank(false);
        assert!(constraint.check(Some(&ParamValue::Array(Vec::new()))).is_err());
        assert!(constraint.check(Some(&ParamValue::Hash(IndexMap::new()))).is_err());
        assert!(constraint.check(None).is_err());
        assert!(constraint.check(Some(&ParamValue::Integer(0))).is_ok());
    }

    #[test]
    fn test_is_value_and_pattern() {
        let exact = Constraint::Is(Matcher::Value(text("foo")));
        assert!(exact.check(Some(&text("foo"))).is_ok());
        let err = exact.check(Some(&text("bar"))).unwrap_err();
        assert_eq!(err.constraint_message(), "is not foo");

        let pattern = Constraint::Is(Matcher::Pattern(Regex::new("^[a-z]+$").unwrap()));
        assert!(pattern.check(Some(&text("abc"))).is_ok());
        assert!(pattern.check(Some(&text("ab1"))).is_err());
        assert!(pattern.check(Some(&ParamValue::Integer(1))).is_err());
        assert!(pattern.check(None).is_err());
    }

    #[test]
    fn test_in_range_and_set() {
        let range = Constraint::In(Membership::range(1, 10));
        assert!(range.check(Some(&ParamValue::Integer(1))).is_ok());
        assert!(range.check(Some(&ParamValue::Integer(10))).is_ok());
        assert!(range.check(Some(&ParamValue::Integer(11))).is_err());
        assert!(range.check(None).is_ok());

        let set = Constraint::In(Membership::set(["ASC", "DESC"]));
        assert!(set.check(Some(&text("ASC"))).is_ok());
        let err = set.check(Some(&text("up"))).unwrap_err();
        assert_eq!(err.constraint_message(), r#"not in ["ASC", "DESC"]"#);
    }

    #[test]
    fn test_min_max() {
        assert!(Constraint::Min(ParamValue::Integer(12)).check(Some(&ParamValue::Integer(12))).is_ok());
        assert!(Constraint::Min(ParamValue::Integer(12)).check(Some(&ParamValue::Integer(7))).is_err());
        assert!(Constraint::Max(ParamValue::Integer(20)).check(Some(&ParamValue::Float(20.5))).is_err());
        assert!(Constraint::Max(ParamValue::Integer(20)).check(None).is_ok());
    }

    #[test]
    fn test_incomparable_bound_fails() {
        let err = Constraint::Min(ParamValue::Integer(1))
            .check(Some(&text("abc")))
            .unwrap_err();
        assert_eq!(err.kind(), ConstraintKind::Min);
    }

    #[test]
    fn test_lengths() {
        assert!(Constraint::MinLength(5).check(Some(&text("abcd"))).is_err());
        assert!(Constraint::MinLength(5).check(Some(&text("abcde"))).is_ok());
        assert!(Constraint::MaxLength(2).check(Some(&ParamValue::from(vec!["a", "b", "c"]))).is_err());
        assert!(Constraint::MaxLength(2).check(None).is_ok());
    }

    #[test]
    fn test_first_failure_wins_in_declaration_order() {
        let options = ParamOptions::new().max_length(2).min(100);
        let err = validate(Some(&ParamValue::Integer(12345)), &options).unwrap_err();
        assert_eq!(err.kind(), ConstraintKind::MaxLength);

        let options = ParamOptions::new().min(100).max_length(2);
        let err = validate(Some(&ParamValue::Integer(12345)), &options).unwrap_err();
        assert_eq!(err.kind(), ConstraintKind::MaxLength);

        let err = validate(Some(&ParamValue::Integer(5)), &options).unwrap_err();
        assert_eq!(err.kind(), ConstraintKind::Min);
    }
}
