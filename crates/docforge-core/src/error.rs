//! Error types for docforge.
//!
//! All errors in the system are represented by the [`Error`] enum.
//! This ensures composable error handling across crates.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all docforge operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Document source could not be read or decoded
    #[error("Cannot read document {path}: {source}")]
    ParseFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Invalid orphan ignore pattern
    #[error("Invalid ignore pattern: {reason}")]
    PatternError { reason: String },

    /// Input root is missing or not a directory
    #[error("Input root is not a readable directory: {path}")]
    BadInputRoot { path: PathBuf },

    /// Generic unclassified error
    #[error("Error: {0}")]
    Other(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an IO error
    pub fn io(err: io::Error) -> Self {
        Error::Io(err)
    }

    /// Create a parse failure for a document path
    pub fn parse_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::ParseFailure {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create an ignore pattern error
    pub fn pattern_error(reason: impl Into<String>) -> Self {
        Error::PatternError {
            reason: reason.into(),
        }
    }

    /// Create a bad input root error
    pub fn bad_input_root(path: impl Into<PathBuf>) -> Self {
        Error::BadInputRoot { path: path.into() }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::bad_input_root("/missing/root");
        assert!(err.to_string().contains("not a readable directory"));

        let err = Error::config_error("root must start with '/'");
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_parse_failure_carries_path() {
        let io = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = Error::parse_failure("/site/a.txt", io);
        assert!(err.to_string().contains("/site/a.txt"));
    }
}
