//! Fidela error type.

use thiserror::Error;

/// Errors produced anywhere in the Fidela stack.
#[derive(Debug, Error)]
pub enum FidelaError {
    /// Configuration loading/parsing problems.
    #[error("config error: {0}")]
    Config(String),

    /// Persistent store (SQLite) failures.
    #[error("store error: {0}")]
    Store(String),

    /// Outbound channel failures — the opaque reason string from the Sender.
    #[error("channel error: {0}")]
    Channel(String),

    /// Invalid operator input (missing required fields, bad dates).
    #[error("validation error: {0}")]
    Validation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FidelaError>;
