//! Parameter values and declared target types.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

use crate::DeclarationError;

/// A request parameter value, either raw (usually [`ParamValue::Text`]) or
/// coerced to one of the supported target types.
///
/// Absence is not a variant: the engine passes `Option<&ParamValue>` around
/// and `None` means "no value".
///
/// Equality treats integers and floats as numbers, so `Integer(1)` equals
/// `Float(1.0)`. All other variants only equal themselves.
#[derive(Debug, Clone)]
pub enum ParamValue {
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Text, the shape every raw value arrives in.
    Text(String),
    /// A point in time with its UTC offset.
    Time(DateTime<FixedOffset>),
    /// A calendar date.
    Date(NaiveDate),
    /// A calendar date and wall-clock time.
    DateTime(NaiveDateTime),
    /// Sequence of text values.
    Array(Vec<String>),
    /// Ordered mapping of text keys to text values.
    Hash(IndexMap<String, String>),
    /// Boolean flag.
    Boolean(bool),
    /// Already-typed host value of any other type.
    Opaque(Opaque),
}

impl ParamValue {
    /// Wraps an arbitrary host value.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Opaque::new(value))
    }

    /// Returns `true` if this value is already an instance of `target`.
    #[must_use]
    pub fn is_a(&self, target: TargetType) -> bool {
        matches!(
            (self, target),
            (Self::Integer(_), TargetType::Integer)
                | (Self::Float(_), TargetType::Float)
                | (Self::Text(_), TargetType::String)
                | (Self::Time(_), TargetType::Time)
                | (Self::Date(_), TargetType::Date)
                | (Self::DateTime(_), TargetType::DateTime)
                | (Self::Array(_), TargetType::Array)
                | (Self::Hash(_), TargetType::Hash)
                | (Self::Boolean(_), TargetType::Boolean)
        ) || matches!((self, target), (Self::Opaque(o), TargetType::Opaque(t)) if o.type_id == t.id)
    }

    /// Returns the text if this is a [`ParamValue::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`ParamValue::Integer`].
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as `f64` for integers and floats.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag if this is a [`ParamValue::Boolean`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the text form used when a value has to be read as a string.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            other => other.to_string(),
        }
    }

    /// Size used by length constraints.
    ///
    /// Characters for text, elements for arrays and hashes, and the length of
    /// the text form for everything else.
    #[must_use]
    pub fn length(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Array(items) => items.len(),
            Self::Hash(pairs) => pairs.len(),
            other => other.to_string().chars().count(),
        }
    }

    /// Orders two values of compatible domains.
    ///
    /// Numbers compare numerically across integer and float, temporal values
    /// compare chronologically, text compares lexicographically. Returns
    /// `None` for anything else.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Integer(_) | Self::Float(_), Self::Integer(_) | Self::Float(_)) => {
                self.as_f64()?.partial_cmp(&other.as_f64()?)
            }
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Time(a), Self::Time(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Writes the value in its inspected form: text is quoted.
    pub(crate) fn fmt_inspect(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            other => write!(f, "{other}"),
        }
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Integer(_) | Self::Float(_), Self::Integer(_) | Self::Float(_)) => {
                self.as_f64() == other.as_f64()
            }
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Hash(a), Self::Hash(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for ParamValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::Text(text) => f.write_str(text),
            Self::Time(time) => write!(f, "{}", time.format("%Y-%m-%d %H:%M:%S %z")),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::DateTime(datetime) => write!(f, "{}", datetime.format("%Y-%m-%dT%H:%M:%S")),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item:?}")?;
                }
                f.write_str("]")
            }
            Self::Hash(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?} => {value:?}")?;
                }
                f.write_str("}")
            }
            Self::Boolean(flag) => write!(f, "{flag}"),
            Self::Opaque(opaque) => f.write_str(short_type_name(opaque.type_name())),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Text(text) => serializer.serialize_str(text),
            Self::Time(time) => serializer.serialize_str(&time.to_rfc3339()),
            Self::Array(items) => items.serialize(serializer),
            Self::Hash(pairs) => pairs.serialize(serializer),
            Self::Boolean(flag) => serializer.serialize_bool(*flag),
            Self::Date(_) | Self::DateTime(_) | Self::Opaque(_) => {
                serializer.collect_str(self)
            }
        }
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for ParamValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for ParamValue {
    fn from(flag: bool) -> Self {
        Self::Boolean(flag)
    }
}

impl From<DateTime<FixedOffset>> for ParamValue {
    fn from(time: DateTime<FixedOffset>) -> Self {
        Self::Time(time)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for ParamValue {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::DateTime(datetime)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self {
        Self::Array(items)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(items: Vec<&str>) -> Self {
        Self::Array(items.into_iter().map(String::from).collect())
    }
}

impl From<IndexMap<String, String>> for ParamValue {
    fn from(pairs: IndexMap<String, String>) -> Self {
        Self::Hash(pairs)
    }
}

/// A host value of a type outside the built-in set.
///
/// Opaque values are never produced by coercion. Hosts store them in the
/// parameter map directly and declare them with [`TargetType::opaque`]; the
/// engine then only checks that the stored value has the declared type.
/// Two opaque values are equal only if they share the same allocation.
#[derive(Clone)]
pub struct Opaque {
    type_id: TypeId,
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    /// Wraps a host value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Returns the wrapped value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Name of the wrapped type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.value).cast::<()>() == Arc::as_ptr(&other.value).cast::<()>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque").field(&self.type_name).finish()
    }
}

// `my_app::models::Upload` renders as `Upload`; generic arguments keep
// their full paths.
fn short_type_name(name: &str) -> &str {
    let end = name.find('<').unwrap_or(name.len());
    let start = name[..end].rfind("::").map_or(0, |i| i + 2);
    &name[start..]
}

/// Identity of a host type used as an opaque target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpaqueType {
    id: TypeId,
    name: &'static str,
}

impl OpaqueType {
    /// Name of the type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The type a parameter is declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// Whole number.
    Integer,
    /// Floating point number.
    Float,
    /// Text.
    String,
    /// Instant with offset.
    Time,
    /// Calendar date.
    Date,
    /// Calendar date and wall-clock time.
    DateTime,
    /// Delimited list of text.
    Array,
    /// Delimited list of `key:value` pairs.
    Hash,
    /// Boolean flag.
    Boolean,
    /// Any other host type; identity check only.
    Opaque(OpaqueType),
}

impl TargetType {
    /// Target for host values of type `T`.
    #[must_use]
    pub fn opaque<T: Any>() -> Self {
        Self::Opaque(OpaqueType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        })
    }

    /// Resolves a built-in target type by name, ignoring case.
    ///
    /// Opaque targets cannot be named and must be built with
    /// [`TargetType::opaque`].
    pub fn from_name(name: &str) -> Result<Self, DeclarationError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(Self::Integer),
            "float" | "number" => Ok(Self::Float),
            "string" | "text" => Ok(Self::String),
            "time" => Ok(Self::Time),
            "date" => Ok(Self::Date),
            "datetime" | "date_time" => Ok(Self::DateTime),
            "array" | "list" => Ok(Self::Array),
            "hash" | "map" => Ok(Self::Hash),
            "boolean" | "bool" => Ok(Self::Boolean),
            _ => Err(DeclarationError::UnknownType(name.to_string())),
        }
    }
}

impl FromStr for TargetType {
    type Err = DeclarationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::String => "String",
            Self::Time => "Time",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Array => "Array",
            Self::Hash => "Hash",
            Self::Boolean => "Boolean",
            Self::Opaque(opaque) => short_type_name(opaque.name),
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Upload;

    #[test]
    fn test_numeric_equality_crosses_variants() {
        assert_eq!(ParamValue::Integer(1), ParamValue::Float(1.0));
        assert_ne!(ParamValue::Integer(1), ParamValue::Text("1".into()));
    }

    #[test]
    fn test_compare_domains() {
        let a = ParamValue::Integer(3);
        let b = ParamValue::Float(3.5);
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(
            ParamValue::from("abc").compare(&ParamValue::from("abd")),
            Some(Ordering::Less)
        );
        assert_eq!(ParamValue::Boolean(true).compare(&ParamValue::Boolean(false)), None);
        assert_eq!(ParamValue::Integer(1).compare(&ParamValue::from("1")), None);
    }

    #[test]
    fn test_display_matches_message_rendering() {
        assert_eq!(ParamValue::Float(1.0).to_string(), "1.0");
        assert_eq!(ParamValue::from(vec!["ASC", "DESC"]).to_string(), r#"["ASC", "DESC"]"#);

        let mut pairs = IndexMap::new();
        pairs.insert("a".to_string(), "1".to_string());
        assert_eq!(ParamValue::Hash(pairs).to_string(), r#"{"a" => "1"}"#);

        let date = NaiveDate::from_ymd_opt(2014, 1, 20).unwrap();
        assert_eq!(ParamValue::Date(date).to_string(), "2014-01-20");
    }

    #[test]
    fn test_length() {
        assert_eq!(ParamValue::from("héllo").length(), 5);
        assert_eq!(ParamValue::from(vec!["a", "b"]).length(), 2);
        assert_eq!(ParamValue::Integer(12345).length(), 5);
    }

    #[test]
    fn test_opaque_identity() {
        let value = ParamValue::opaque(Upload);
        assert!(value.is_a(TargetType::opaque::<Upload>()));
        assert!(!value.is_a(TargetType::opaque::<String>()));
        assert!(!value.is_a(TargetType::String));

        let copy = value.clone();
        assert_eq!(value, copy);
        assert_ne!(value, ParamValue::opaque(Upload));
        assert_eq!(TargetType::opaque::<Upload>().to_string(), "Upload");
        assert_eq!(value.to_string(), "Upload");

        if let ParamValue::Opaque(opaque) = &value {
            assert!(opaque.downcast_ref::<Upload>().is_some());
        }
    }

    #[test]
    fn test_target_type_from_name() {
        assert_eq!(TargetType::from_name("Integer").unwrap(), TargetType::Integer);
        assert_eq!("bool".parse::<TargetType>().unwrap(), TargetType::Boolean);
        assert_eq!(TargetType::from_name("DateTime").unwrap(), TargetType::DateTime);
        assert!(TargetType::from_name("Class").is_err());
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ParamValue::from(vec!["a", "b"])).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let date = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
        let json = serde_json::to_string(&ParamValue::Date(date)).unwrap();
        assert_eq!(json, r#""2014-01-01""#);
    }
}
