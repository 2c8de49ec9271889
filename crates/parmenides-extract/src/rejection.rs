//! Request rejections.
//!
//! A [`Rejection`] is what a failed declaration hands back to the host in
//! place of a response: a `400 Bad Request` with a rendered body. Handlers
//! propagate it with `?` and convert it at the edge with
//! [`Rejection::into_response`].

use std::fmt;

use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use parmenides_core::{JsonEncoder, ParamError};
use serde_json::json;

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// A request rejected by a parameter declaration.
///
/// # Example
///
/// ```rust
/// use parmenides_extract::Rejection;
/// use http::StatusCode;
///
/// let rejection = Rejection::text("Parameter arg is required.");
/// assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
///
/// let response = rejection.into_response();
/// assert_eq!(response.body().as_ref(), b"Parameter arg is required.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    status: StatusCode,
    body: String,
    content_type: &'static str,
}

impl Rejection {
    /// Creates a rejection with a JSON body that is already encoded.
    #[must_use]
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: body.into(),
            content_type: JSON_CONTENT_TYPE,
        }
    }

    /// Creates a rejection with a plain text body.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: body.into(),
            content_type: TEXT_CONTENT_TYPE,
        }
    }

    /// Renders a declaration failure for parameter `name`.
    ///
    /// With `json` set the body is the error's `{"message": ...}` payload
    /// encoded by `encoder`, otherwise it is the plain message.
    #[must_use]
    pub fn from_param_error(
        name: &str,
        error: &ParamError,
        json: bool,
        encoder: Option<&dyn JsonEncoder>,
    ) -> Self {
        if json {
            Self::json(error.to_json(name, encoder))
        } else {
            Self::text(error.message(name))
        }
    }

    /// Renders a mutual exclusivity failure across `names`.
    #[must_use]
    pub fn mutually_exclusive(
        names: &[&str],
        json: bool,
        encoder: Option<&dyn JsonEncoder>,
    ) -> Self {
        let message = format!("Parameters {} are mutually exclusive", names.join(", "));
        if json {
            let payload = json!({ "message": message });
            match encoder {
                Some(encoder) => Self::json(encoder.encode(&payload)),
                None => Self::json(payload.to_string()),
            }
        } else {
            Self::text(message)
        }
    }

    /// Status code of the rejection. Always `400 Bad Request`.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Rendered body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Content type of the rendered body.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Returns `true` if the body is JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type == JSON_CONTENT_TYPE
    }

    /// Converts the rejection into an HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(Bytes::from(self.body));
        *response.status_mut() = self.status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(self.content_type),
        );
        response
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.body)
    }
}

impl std::error::Error for Rejection {}

impl From<Rejection> for Response<Bytes> {
    fn from(rejection: Rejection) -> Self {
        rejection.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parmenides_core::TargetType;
    use serde_json::Value;

    struct PrettyEncoder;

    impl JsonEncoder for PrettyEncoder {
        fn encode(&self, value: &Value) -> String {
            serde_json::to_string_pretty(value).unwrap_or_default()
        }
    }

    #[test]
    fn test_from_param_error_text() {
        let error = ParamError::coercion(TargetType::Integer);
        let rejection = Rejection::from_param_error("arg", &error, false, None);
        assert_eq!(rejection.body(), "Parameter arg is not Integer");
        assert!(!rejection.is_json());
    }

    #[test]
    fn test_from_param_error_json() {
        let error = ParamError::coercion(TargetType::Integer);
        let rejection = Rejection::from_param_error("arg", &error, true, None);
        assert_eq!(rejection.body(), r#"{"message":"Parameter arg is not Integer"}"#);
        assert!(rejection.is_json());
    }

    #[test]
    fn test_custom_encoder() {
        let error = ParamError::coercion(TargetType::Integer);
        let rejection = Rejection::from_param_error("arg", &error, true, Some(&PrettyEncoder));
        assert!(rejection.body().contains('\n'));
    }

    #[test]
    fn test_mutually_exclusive() {
        let rejection = Rejection::mutually_exclusive(&["a", "b", "c"], false, None);
        assert_eq!(rejection.body(), "Parameters a, b, c are mutually exclusive");

        let rejection = Rejection::mutually_exclusive(&["a", "b"], true, None);
        let body: Value = serde_json::from_str(rejection.body()).unwrap();
        assert_eq!(body["message"], "Parameters a, b are mutually exclusive");
    }

    #[test]
    fn test_into_response() {
        let response: Response<Bytes> = Rejection::json(r#"{"message":"x"}"#).into();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(response.body().as_ref(), br#"{"message":"x"}"#);
    }
}
