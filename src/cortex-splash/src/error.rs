//! Error types for splash screen operations.

use thiserror::Error;

/// Error type for splash persistence and terminal probing.
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration (de)serialization failed.
    #[error("config serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// No home/config directory could be determined for this user.
    #[error("could not determine a config directory")]
    ConfigDirNotFound,
}

/// Result type alias using the splash Error type.
pub type Result<T> = std::result::Result<T, Error>;
