//! Error types for the weekgrid engine.

use thiserror::Error;

/// Errors that can occur while normalizing or combining calendars.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch calendar feed: {0}")]
    Fetch(String),

    #[error("Feed request timed out after {0}s")]
    FetchTimeout(u64),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid calendar cell: {0}")]
    Schema(String),

    #[error("Calendar rejected: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("No calendar registered for '{0}'")]
    UnknownUser(String),
}

impl GridError {
    /// Whether the failure came from retrieving the feed rather than its content.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::FetchTimeout(_))
    }
}

/// Result type alias for weekgrid operations.
pub type GridResult<T> = Result<T, GridError>;
