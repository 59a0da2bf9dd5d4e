//! Domain error types.

use thiserror::Error;

/// Message of the error raised when the configured notification does not
/// provide the verification code capability
pub const INVALID_NOTIFICATION_MESSAGE: &str =
    "The notification should implement the VerificationCodeNotification capability.";

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("{message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// The configuration error raised for a notification that cannot carry a code
    pub fn invalid_notification() -> Self {
        DomainError::Configuration {
            message: INVALID_NOTIFICATION_MESSAGE.to_string(),
        }
    }

    /// Whether this error was caused by configuration rather than runtime state
    pub fn is_configuration(&self) -> bool {
        matches!(self, DomainError::Configuration { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
