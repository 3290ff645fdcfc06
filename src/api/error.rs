use serde_json::Value;
use thiserror::Error;

/// Typed failure for every API interaction.
///
/// Cloneable so the query cache can hold the failure on an entry while the
/// same failure propagates to the caller.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    #[error("invalid response body: {0}")]
    Parse(String),

    #[error("invalid request parameters: {0}")]
    Validation(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            // Back off to a char boundary so multi-byte text never splits.
            let mut cut = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..cut],
                body.len()
            )
        }
    }

    /// Build an error from a non-2xx response.
    ///
    /// If the body is JSON carrying a `message` (or `error`) field, that
    /// becomes the error message; otherwise a generic one is used. The
    /// parsed body rides along for callers that want the details.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(Value::as_str)
            })
            .map(str::to_string)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    Self::truncate_body(body)
                }
            });

        ApiError::Http {
            status: status.as_u16(),
            message,
            body: parsed,
        }
    }

    /// HTTP status code, when this failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // Status errors are classified in the transport from the response
        // body; anything surfacing here means the call did not complete.
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_uses_json_message() {
        let err = ApiError::from_status(
            StatusCode::FORBIDDEN,
            r#"{"message": "admin role required"}"#,
        );
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "HTTP 403: admin role required");
    }

    #[test]
    fn test_from_status_falls_back_to_reason_phrase() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "");
        match err {
            ApiError::Http {
                status,
                message,
                body,
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
                assert!(body.is_none());
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_status_keeps_non_json_body() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream fell over");
        assert_eq!(err.to_string(), "HTTP 502: upstream fell over");
    }

    #[test]
    fn test_truncates_long_bodies() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::Http { message, .. } => {
                assert!(message.len() < 600);
                assert!(message.contains("truncated, 2000 total bytes"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn test_truncates_multibyte_bodies_on_a_char_boundary() {
        // "é" is two bytes; place one across the 500-byte cut.
        let body = format!("{}ééééé", "x".repeat(499));
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::Http { message, .. } => {
                assert!(message.starts_with(&"x".repeat(499)));
                assert!(message.contains("truncated, 509 total bytes"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "{}");
        assert!(err.is_unauthorized());
        assert!(!ApiError::Parse("nope".into()).is_unauthorized());
    }
}
