//! Error types for the chat model.

use thiserror::Error;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Main error type for the chat model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Message not found: {id}")]
    MessageNotFound { id: String },

    #[error("Duplicate message: {id}")]
    DuplicateMessage { id: String },

    #[error("Thread too deep: reply at depth {depth} exceeds max {max}")]
    ThreadTooDeep { depth: usize, max: usize },

    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl ModelError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error for messages
    pub fn message_not_found(id: impl Into<String>) -> Self {
        Self::MessageNotFound { id: id.into() }
    }

    /// Create a duplicate id error
    pub fn duplicate_message(id: impl Into<String>) -> Self {
        Self::DuplicateMessage { id: id.into() }
    }

    /// Create a thread depth error
    pub fn thread_too_deep(depth: usize, max: usize) -> Self {
        Self::ThreadTooDeep { depth, max }
    }

    /// Create a timestamp parsing error
    pub fn invalid_timestamp(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Whether the error was caused by bad input rather than a missing entity
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::ThreadTooDeep { .. } | Self::InvalidTimestamp { .. }
        )
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization error: {}", err),
        }
    }
}

impl From<chrono::ParseError> for ModelError {
    fn from(err: chrono::ParseError) -> Self {
        Self::Validation {
            message: format!("Date parsing error: {}", err),
        }
    }
}
