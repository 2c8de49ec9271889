//! Response content type negotiation.

use mime::Mime;
use tracing::warn;

/// Returns `true` when errors for `content_type` should be rendered as JSON.
///
/// A type qualifies when its subtype or suffix is `json` (for example
/// `application/json` or `application/problem+json`), or when its essence
/// appears in `extra`. Parameters such as `charset` are ignored.
///
/// ```rust
/// use parmenides_extract::is_json_compatible;
///
/// assert!(is_json_compatible("application/json; charset=utf-8", &[]));
/// assert!(is_json_compatible("application/vnd.api+json", &[]));
/// assert!(!is_json_compatible("text/html", &[]));
/// assert!(is_json_compatible("text/x-json-lines", &["text/x-json-lines".into()]));
/// ```
#[must_use]
pub fn is_json_compatible(content_type: &str, extra: &[String]) -> bool {
    let mime: Mime = match content_type.trim().parse() {
        Ok(mime) => mime,
        Err(error) => {
            warn!(content_type, %error, "unparseable response content type");
            return false;
        }
    };

    if mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON) {
        return true;
    }

    let essence = mime.essence_str();
    extra
        .iter()
        .any(|candidate| candidate.trim().eq_ignore_ascii_case(essence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_types() {
        assert!(is_json_compatible("application/json", &[]));
        assert!(is_json_compatible("APPLICATION/JSON", &[]));
        assert!(is_json_compatible("application/hal+json", &[]));
        assert!(is_json_compatible("text/json", &[]));
    }

    #[test]
    fn test_non_json_types() {
        assert!(!is_json_compatible("text/plain", &[]));
        assert!(!is_json_compatible("application/xml", &[]));
    }

    #[test]
    fn test_malformed_type() {
        assert!(!is_json_compatible("", &[]));
        assert!(!is_json_compatible("not a mime", &[]));
    }

    #[test]
    fn test_extra_types() {
        let extra = vec!["application/x-ndjson".to_string()];
        assert!(is_json_compatible("application/x-ndjson; charset=utf-8", &extra));
        assert!(!is_json_compatible("application/x-ndjson", &[]));
    }
}
