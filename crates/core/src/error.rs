// Error types for timeline operations

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Errors that can occur while managing timeline events
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Client input was rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Event store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Milestone suggestion provider error
    #[error("Suggestion error: {0}")]
    Suggestion(String),

    /// Media store error
    #[error("Media error: {0}")]
    Media(String),
}

impl TimelineError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        TimelineError::Storage(msg.into())
    }

    /// Create a suggestion error
    pub fn suggestion(msg: impl Into<String>) -> Self {
        TimelineError::Suggestion(msg.into())
    }

    /// Create a media error
    pub fn media(msg: impl Into<String>) -> Self {
        TimelineError::Media(msg.into())
    }

    /// Whether the error was caused by the client rather than a backend
    pub fn is_validation(&self) -> bool {
        matches!(self, TimelineError::Validation(_))
    }
}
