//! Domain error model.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures detected locally, before anything reaches the backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A path or query parameter did not parse as a numeric id.
    #[error("invalid {kind}: '{value}'")]
    InvalidId { kind: &'static str, value: String },

    /// Password-reset links without a token cannot be honoured.
    #[error("reset token is missing")]
    MissingResetToken,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("passwords do not match")]
    PasswordMismatch,
}

impl DomainError {
    pub fn invalid_id(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidId {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_rendered() {
        assert_eq!(
            DomainError::PasswordTooShort { min: 8 }.to_string(),
            "password must be at least 8 characters"
        );
        assert_eq!(
            DomainError::invalid_id("UserId", "abc").to_string(),
            "invalid UserId: 'abc'"
        );
    }
}
