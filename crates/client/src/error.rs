//! Client error model.

use reqwest::StatusCode;
use thiserror::Error;

use leydeudo_core::DomainError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
        /// Parsed JSON error body, when the backend sent one.
        body: Option<serde_json::Value>,
    },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Rejected locally before any request was sent.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }
}

impl ApiError {
    /// Build a status error from a response body.
    ///
    /// The message is the body's `message` field when present, otherwise the
    /// canonical reason phrase.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let body: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        ApiError::Status {
            status,
            message,
            body,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The session token was rejected; callers should log out.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Per-field validation messages (`{"errors": {"email": [...]}}`).
    pub fn field_errors(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        match self {
            ApiError::Status {
                body: Some(body), ..
            } => body.get("errors").and_then(|errors| errors.as_object()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_comes_from_body() {
        let err = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "The email has already been taken.", "errors": {"email": ["taken"]}}"#,
        );
        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(err.to_string(), "HTTP 422 Unprocessable Entity: The email has already been taken.");
        assert!(err.field_errors().unwrap().contains_key("email"));
    }

    #[test]
    fn falls_back_to_reason_phrase() {
        let err = ApiError::from_response(StatusCode::UNAUTHORIZED, "<html>nope</html>");
        assert!(err.is_unauthorized());
        assert!(matches!(
            &err,
            ApiError::Status { message, body: None, .. } if message == "Unauthorized"
        ));
        assert!(err.field_errors().is_none());
    }
}
