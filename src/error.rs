//! Library error type

use thiserror::Error;

/// Errors returned by the scorer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AeoError {
    /// Content was empty or whitespace-only. Not retryable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
