//! Engine-wide settings.

/// Delimiter between array items and hash pairs.
pub const DEFAULT_DELIMITER: &str = ",";

/// Separator between a hash key and its value.
pub const DEFAULT_SEPARATOR: &str = ":";

/// Settings shared by every declaration handled by one engine.
///
/// Per-declaration `delimiter` and `separator` options take precedence over
/// the values here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Fallback delimiter for array and hash coercion.
    pub delimiter: String,

    /// Fallback separator for hash coercion.
    pub separator: String,

    /// Substitute defaults for blank values as well as absent ones.
    pub default_on_blank: bool,

    /// Media types rendered as JSON in addition to `application/json` and
    /// `+json` types.
    pub json_content_types: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            default_on_blank: false,
            json_content_types: Vec::new(),
        }
    }
}
