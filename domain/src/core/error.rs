//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No providers configured")]
    NoProviders,

    #[error("Session key cannot be empty")]
    EmptySessionKey,

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Unknown selection policy: {0}. Valid: reference, resynthesis")]
    UnknownPolicy(String),
}

impl DomainError {
    /// Check if this error was caused by caller input rather than configuration
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::EmptySessionKey | DomainError::InvalidQuestion(_)
        )
    }
}
