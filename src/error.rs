//! Error types for the rating and balancing engines
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. Typed failures are raised as [`RatingError`] and can be
//! recovered with `downcast_ref`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Numerical failure: {reason}")]
    NumericalFailure { reason: String },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },
}

impl RatingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        RatingError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        RatingError::ConfigurationError {
            message: message.into(),
        }
    }
}
