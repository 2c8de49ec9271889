//! Type coercion.
//!
//! [`coerce`] converts a raw value into the declared [`TargetType`]. Values
//! already of the target type pass through unchanged, which makes repeated
//! declarations of the same parameter harmless. Every failure is reported as
//! an `is` error carrying the target type.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::temporal::{parse_date, parse_datetime, parse_time};
use crate::{EngineSettings, ParamError, ParamOptions, ParamValue, TargetType};

/// Coerces `raw` to `target`.
///
/// Returns `Ok(None)` for absent input, and for boolean input that matches
/// neither the truthy nor the falsy spellings.
///
/// ```rust
/// use parmenides_core::{coerce, EngineSettings, ParamOptions, ParamValue, TargetType};
///
/// let options = ParamOptions::new();
/// let settings = EngineSettings::default();
///
/// let raw = ParamValue::from("a:1,b:2");
/// let hash = coerce(Some(&raw), TargetType::Hash, &options, &settings).unwrap().unwrap();
/// assert_eq!(hash.to_string(), r#"{"a" => "1", "b" => "2"}"#);
///
/// let raw = ParamValue::from("twelve");
/// let err = coerce(Some(&raw), TargetType::Integer, &options, &settings).unwrap_err();
/// assert_eq!(err.message("arg"), "Parameter arg is not Integer");
/// ```
pub fn coerce(
    raw: Option<&ParamValue>,
    target: TargetType,
    options: &ParamOptions,
    settings: &EngineSettings,
) -> Result<Option<ParamValue>, ParamError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    if raw.is_a(target) {
        return Ok(Some(raw.clone()));
    }

    let delimiter = options.delimiter_override().unwrap_or(settings.delimiter.as_str());
    let separator = options.separator_override().unwrap_or(settings.separator.as_str());
    let fail = || ParamError::coercion(target);

    let value = match (target, raw) {
        (TargetType::Integer, ParamValue::Float(n)) => float_to_integer(*n).ok_or_else(fail)?,
        (TargetType::Integer, raw) => {
            ParamValue::Integer(parse_integer(&raw.to_text()).ok_or_else(fail)?)
        }
        (TargetType::Float, ParamValue::Integer(n)) => ParamValue::Float(*n as f64),
        (TargetType::Float, raw) => ParamValue::Float(parse_float(&raw.to_text()).ok_or_else(fail)?),
        (TargetType::String, raw) => ParamValue::Text(raw.to_text()),
        (TargetType::Time, raw) => ParamValue::Time(parse_time(&raw.to_text()).ok_or_else(fail)?),
        (TargetType::Date, ParamValue::Time(time)) => ParamValue::Date(time.date_naive()),
        (TargetType::Date, ParamValue::DateTime(datetime)) => ParamValue::Date(datetime.date()),
        (TargetType::Date, raw) => ParamValue::Date(parse_date(&raw.to_text()).ok_or_else(fail)?),
        (TargetType::DateTime, ParamValue::Time(time)) => ParamValue::DateTime(time.naive_local()),
        (TargetType::DateTime, raw) => {
            ParamValue::DateTime(parse_datetime(&raw.to_text()).ok_or_else(fail)?)
        }
        (TargetType::Array, raw) => ParamValue::Array(split_array(&raw.to_text(), delimiter)),
        (TargetType::Hash, raw) => {
            ParamValue::Hash(split_hash(&raw.to_text(), delimiter, separator).ok_or_else(fail)?)
        }
        (TargetType::Boolean, raw) => return Ok(parse_boolean(&raw.to_text()).map(ParamValue::Boolean)),
        (TargetType::Opaque(_), _) => return Err(fail()),
    };

    Ok(Some(value))
}

// Truncates toward zero; the bounds check keeps the cast in range.
#[allow(clippy::cast_possible_truncation)]
fn float_to_integer(n: f64) -> Option<ParamValue> {
    (n.is_finite() && n >= i64::MIN as f64 && n < i64::MAX as f64)
        .then(|| ParamValue::Integer(n.trunc() as i64))
}

fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let lower = body.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, lower.as_str())
    };

    let digits = strip_separators(digits)?;
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = i128::from_str_radix(&digits, radix).ok()?;
    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}

// Removes `_` digit separators, rejecting leading, trailing or doubled ones.
fn strip_separators(digits: &str) -> Option<String> {
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }
    Some(digits.replace('_', ""))
}

fn float_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?[0-9](_?[0-9])*(\.[0-9](_?[0-9])*)?([eE][+-]?[0-9]+)?$")
            .expect("float pattern is valid")
    })
}

fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim();
    if !float_pattern().is_match(text) {
        return None;
    }
    text.replace('_', "").parse::<f64>().ok().filter(|n| n.is_finite())
}

fn split_array(text: &str, delimiter: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(delimiter).map(String::from).collect()
}

fn split_hash(text: &str, delimiter: &str, separator: &str) -> Option<IndexMap<String, String>> {
    if text.is_empty() {
        return Some(IndexMap::new());
    }
    split_fields(text, delimiter)
        .into_iter()
        .map(|pair| match split_fields(pair, separator).as_slice() {
            [key, value] => Some(((*key).to_string(), (*value).to_string())),
            _ => None,
        })
        .collect()
}

// Trailing empty fields are dropped, so `a:` has one field and `a:1,` has
// one pair.
fn split_fields<'t>(text: &'t str, pattern: &str) -> Vec<&'t str> {
    let mut fields: Vec<&str> = text.split(pattern).collect();
    while fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }
    fields
}

fn boolean_patterns() -> &'static (Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("boolean pattern is valid");
        (
            compile(r"(?i)(false|f|no|n|0)$"),
            compile(r"(?i)(true|t|yes|y|1)$"),
        )
    })
}

fn parse_boolean(text: &str) -> Option<bool> {
    let (falsy, truthy) = boolean_patterns();
    if falsy.is_match(text) {
        Some(false)
    } else if truthy.is_match(text) {
        Some(true)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConstraintKind;
    use chrono::NaiveDate;

    fn run(raw: impl Into<ParamValue>, target: TargetType) -> Result<Option<ParamValue>, ParamError> {
        coerce(Some(&raw.into()), target, &ParamOptions::new(), &EngineSettings::default())
    }

    fn run_with(raw: &str, target: TargetType, options: &ParamOptions) -> Option<ParamValue> {
        coerce(Some(&ParamValue::from(raw)), target, options, &EngineSettings::default()).unwrap()
    }

    #[test]
    fn test_absent_stays_absent() {
        let result = coerce(None, TargetType::Integer, &ParamOptions::new(), &EngineSettings::default());
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn test_integer() {
        assert_eq!(run("42", TargetType::Integer).unwrap(), Some(ParamValue::Integer(42)));
        assert_eq!(run(" -7 ", TargetType::Integer).unwrap(), Some(ParamValue::Integer(-7)));
        assert_eq!(run("1_000", TargetType::Integer).unwrap(), Some(ParamValue::Integer(1000)));
        assert_eq!(run("0x1f", TargetType::Integer).unwrap(), Some(ParamValue::Integer(31)));
        assert_eq!(run("0b101", TargetType::Integer).unwrap(), Some(ParamValue::Integer(5)));
        assert_eq!(run(2.9, TargetType::Integer).unwrap(), Some(ParamValue::Integer(2)));
    }

    #[test]
    fn test_integer_rejects() {
        for raw in ["", "abc", "1.5", "12abc", "+-1", "1__0", "_1", "99999999999999999999"] {
            let err = run(raw, TargetType::Integer).unwrap_err();
            assert_eq!(err.kind(), ConstraintKind::Is, "input: {raw}");
        }
    }

    #[test]
    fn test_float() {
        assert_eq!(run("1.5", TargetType::Float).unwrap(), Some(ParamValue::Float(1.5)));
        assert_eq!(run("-2e3", TargetType::Float).unwrap(), Some(ParamValue::Float(-2000.0)));
        assert_eq!(run("3", TargetType::Float).unwrap(), Some(ParamValue::Float(3.0)));
        assert_eq!(run(3, TargetType::Float).unwrap(), Some(ParamValue::Float(3.0)));
        for raw in ["NaN", "inf", "1.", "abc", ""] {
            assert!(run(raw, TargetType::Float).is_err(), "input: {raw}");
        }
    }

    #[test]
    fn test_string_never_fails() {
        assert_eq!(run(123, TargetType::String).unwrap(), Some(ParamValue::from("123")));
        assert_eq!(run(true, TargetType::String).unwrap(), Some(ParamValue::from("true")));
        assert_eq!(run("", TargetType::String).unwrap(), Some(ParamValue::from("")));
    }

    #[test]
    fn test_temporal() {
        let date = NaiveDate::from_ymd_opt(2014, 1, 20).unwrap();
        assert_eq!(run("2014-01-20", TargetType::Date).unwrap(), Some(ParamValue::Date(date)));
        assert!(matches!(
            run("2014-01-20T10:00:00Z", TargetType::Time).unwrap(),
            Some(ParamValue::Time(_))
        ));
        assert!(matches!(
            run("2014-01-20 10:00:00", TargetType::DateTime).unwrap(),
            Some(ParamValue::DateTime(_))
        ));
        assert!(run("soon", TargetType::Date).is_err());
        assert!(run(ParamValue::Date(date), TargetType::Time).is_ok());
    }

    #[test]
    fn test_array() {
        assert_eq!(
            run("1,2,,3", TargetType::Array).unwrap(),
            Some(ParamValue::from(vec!["1", "2", "", "3"]))
        );
        assert_eq!(run("", TargetType::Array).unwrap(), Some(ParamValue::Array(Vec::new())));

        let options = ParamOptions::new().delimiter("|");
        assert_eq!(
            run_with("a|b", TargetType::Array, &options),
            Some(ParamValue::from(vec!["a", "b"]))
        );
    }

    #[test]
    fn test_hash() {
        let options = ParamOptions::new().delimiter(";").separator("=");
        let Some(ParamValue::Hash(pairs)) = run_with("a=1;b=2", TargetType::Hash, &options) else {
            panic!("expected hash");
        };
        assert_eq!(pairs.get("a").map(String::as_str), Some("1"));
        assert_eq!(pairs.get("b").map(String::as_str), Some("2"));

        assert!(run("a:1,b", TargetType::Hash).is_err());
        assert!(run("a:1:2", TargetType::Hash).is_err());
    }

    #[test]
    fn test_hash_trailing_empty_fields() {
        let err = run("a:", TargetType::Hash).unwrap_err();
        assert_eq!(err.kind(), ConstraintKind::Is);
        assert!(run("a:1,b:", TargetType::Hash).is_err());
        assert!(run("a:1,,b:2", TargetType::Hash).is_err());

        let Some(ParamValue::Hash(pairs)) = run("a:1,", TargetType::Hash).unwrap() else {
            panic!("expected hash");
        };
        assert_eq!(pairs.len(), 1);

        let Some(ParamValue::Hash(pairs)) = run(":1", TargetType::Hash).unwrap() else {
            panic!("expected hash");
        };
        assert_eq!(pairs.get("").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_boolean() {
        for raw in ["true", "TRUE", "t", "yes", "Y", "1"] {
            assert_eq!(run(raw, TargetType::Boolean).unwrap(), Some(ParamValue::Boolean(true)), "input: {raw}");
        }
        for raw in ["false", "F", "no", "n", "0"] {
            assert_eq!(run(raw, TargetType::Boolean).unwrap(), Some(ParamValue::Boolean(false)), "input: {raw}");
        }
        assert_eq!(run("maybe", TargetType::Boolean).unwrap(), None);
        assert_eq!(run(1, TargetType::Boolean).unwrap(), Some(ParamValue::Boolean(true)));
    }

    #[test]
    fn test_opaque_requires_identity() {
        struct Token;
        let err = run("abc", TargetType::opaque::<Token>()).unwrap_err();
        assert_eq!(err.kind(), ConstraintKind::Is);
        assert!(run(ParamValue::opaque(Token), TargetType::opaque::<Token>()).is_ok());
    }

    #[test]
    fn test_already_typed_passes_through() {
        let value = ParamValue::from(vec!["x"]);
        assert_eq!(run(value.clone(), TargetType::Array).unwrap(), Some(value));
        assert_eq!(run(false, TargetType::Boolean).unwrap(), Some(ParamValue::Boolean(false)));
    }
}
