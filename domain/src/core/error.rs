//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No providers configured")]
    NoProviders,

    #[error("Provider configured more than once: {0}")]
    DuplicateProvider(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
}
