//! Presence predicates.

use crate::ParamValue;

/// Returns `true` when `value` carries no meaningful content.
///
/// Text, arrays and hashes are blank when empty; every other value is blank
/// only when absent.
///
/// ```rust
/// use parmenides_core::{blank, ParamValue};
///
/// assert!(blank(None));
/// assert!(blank(Some(&ParamValue::from(""))));
/// assert!(!blank(Some(&ParamValue::Boolean(false))));
/// ```
#[must_use]
pub fn blank(value: Option<&ParamValue>) -> bool {
    match value {
        None => true,
        Some(ParamValue::Text(text)) => text.is_empty(),
        Some(ParamValue::Array(items)) => items.is_empty(),
        Some(ParamValue::Hash(pairs)) => pairs.is_empty(),
        Some(_) => false,
    }
}

/// Negation of [`blank`].
#[must_use]
pub fn present(value: Option<&ParamValue>) -> bool {
    !blank(value)
}
