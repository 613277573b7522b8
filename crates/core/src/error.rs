//! Error types for Tessera
//!
//! One error type is shared by every library crate in the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for Tessera operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Tessera utilities
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations, dumps, etc.)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The backing store rejected the operation or is unreachable
    #[error("Backend error: {0}")]
    Backend(String),

    /// A stored value could not be converted to the requested type
    #[error("Conversion error: cannot read {value:?} as {target}")]
    Conversion {
        /// Name of the requested type
        target: &'static str,
        /// Lossy text rendering of the offending bytes
        value: String,
    },

    /// Stored value has the wrong shape for the operation (list vs. scalar)
    #[error("Wrong type for key {key:?}: {reason}")]
    WrongType {
        /// Key that was accessed
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// Recorded inputs and outputs of an operation differ in length
    #[error("History mismatch for {operation}: {inputs} inputs, {outputs} outputs")]
    HistoryMismatch {
        /// Operation name
        operation: String,
        /// Number of recorded inputs
        inputs: usize,
        /// Number of recorded outputs
        outputs: usize,
    },

    /// A document with the same `_id` already exists
    #[error("Duplicate document id: {0}")]
    DuplicateId(String),

    /// Invalid operation, pipeline stage, or expression
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a conversion error from the raw bytes that failed to convert.
    pub fn conversion(target: &'static str, raw: &[u8]) -> Self {
        Error::Conversion {
            target,
            value: String::from_utf8_lossy(raw).into_owned(),
        }
    }

    /// Build a wrong-type error for `key`.
    pub fn wrong_type(key: &[u8], reason: impl Into<String>) -> Self {
        Error::WrongType {
            key: String::from_utf8_lossy(key).into_owned(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
