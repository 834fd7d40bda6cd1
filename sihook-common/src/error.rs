//! Common error types for sihook

use thiserror::Error;

/// Common result type for sihook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across sihook crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    ///
    /// Raised lazily, when a missing or malformed value is first used.
    #[error("Configuration error: {0}")]
    Config(String),
}
