//! Error types for yearbook.
//!
//! Library crates use [`YearbookError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all yearbook operations.
#[derive(Debug, thiserror::Error)]
pub enum YearbookError {
    /// A directory could not be listed or created.
    #[error("filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A file could not be read, decoded, or written.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration loading or serialization error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Invalid input that passed parsing (empty title, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, YearbookError>;

impl YearbookError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a directory-level `std::io::Error` with its path.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Wrap a file-level `std::io::Error` with its path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = YearbookError::config("bad toml");
        assert_eq!(err.to_string(), "config error: bad toml");

        let err = YearbookError::validation("title must not be empty");
        assert!(err.to_string().contains("title must not be empty"));
    }

    #[test]
    fn io_errors_carry_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = YearbookError::filesystem("/tmp/missing", source);
        let msg = err.to_string();
        assert!(msg.starts_with("filesystem error"));
        assert!(msg.contains("/tmp/missing"));
    }
}
