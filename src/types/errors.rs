//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

use crate::envelope::DecodeError;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the advisory client.
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected user input (bad upload, empty location).
    #[error("validation error: {0}")]
    Validation(String),

    /// Required state is missing (e.g. no stored prediction to advise on).
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// A backend response could not be decoded into a usable payload.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A collaborator answered with a non-success HTTP status.
    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Transport-level HTTP failure (connect, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) | Error::Config(_) => 2,
            Error::NotFound(_) => 3,
            Error::Decode(_) | Error::Serialization(_) => 4,
            Error::Upstream { .. } | Error::Http(_) => 5,
            Error::Io(_) => 8,
        }
    }

    /// Whether the failure came from a remote collaborator rather than local input.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Upstream { .. } | Error::Http(_))
    }
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }
}
