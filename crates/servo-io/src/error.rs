//! Error types for digital line and PWM channel access.

use std::path::PathBuf;

/// Errors raised by I/O backends.
///
/// Every variant names the register file or resource involved so the
/// caller can report exactly what failed.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Register file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Register path
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Register file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Register path
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Value could not be written to a register file.
    #[error("failed to write {value:?} to {}: {source}", path.display())]
    Write {
        /// Register path
        path: PathBuf,
        /// Value being written
        value: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Register held something other than `0` or `1`.
    #[error("invalid level {value:?} in {}", path.display())]
    InvalidLevel {
        /// Register path
        path: PathBuf,
        /// Raw content that failed to parse
        value: String,
    },

    /// Failure injected by the mock backend.
    #[error("injected failure: {0}")]
    Injected(String),
}

impl IoError {
    /// Create an injected failure.
    #[must_use]
    pub fn injected(msg: impl Into<String>) -> Self {
        Self::Injected(msg.into())
    }
}

/// A specialized `Result` type for I/O backend operations.
pub type IoResult<T> = Result<T, IoError>;
