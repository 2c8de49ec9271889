//! The per-request parameter map.
//!
//! [`ParamMap`] is the flat store declarations read from and write back to.
//! It distinguishes a key that is missing from a key that is present with no
//! value, since only the former is skipped by optional declarations.

use indexmap::IndexMap;
use parmenides_core::ParamValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Insertion-ordered map from parameter name to value.
///
/// # Example
///
/// ```rust
/// use parmenides_extract::ParamMap;
/// use parmenides_core::ParamValue;
///
/// let mut params = ParamMap::from_urlencoded("q=rust+lang&limit=10").unwrap();
/// params.insert_null("sort");
///
/// assert_eq!(params.get("q"), Some(&ParamValue::from("rust lang")));
/// assert!(params.contains("sort"));
/// assert_eq!(params.get("sort"), None);
/// assert!(!params.contains("page"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
    entries: IndexMap<String, Option<ParamValue>>,
}

impl ParamMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `application/x-www-form-urlencoded` input such as a query
    /// string or form body. Repeated keys keep the last value.
    pub fn from_urlencoded(input: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(input)?;
        Ok(pairs.into_iter().collect())
    }

    /// Returns `true` if `name` is present, even with no value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the value for `name`, or `None` if it is missing or null.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.get(name).and_then(Option::as_ref)
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(name.into(), Some(value.into()));
    }

    /// Inserts `name` with no value.
    pub fn insert_null(&mut self, name: impl Into<String>) {
        self.entries.insert(name.into(), None);
    }

    /// Sets `name` to `value`, which may be null.
    pub fn set(&mut self, name: impl Into<String>, value: Option<ParamValue>) {
        self.entries.insert(name.into(), value);
    }

    /// Removes `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.entries.shift_remove(name).flatten()
    }

    /// Number of entries, including null ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }
}

impl<K, V> FromIterator<(K, V)> for ParamMap
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl Serialize for ParamMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
