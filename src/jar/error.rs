//! Error types for the cookie jar.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, decoding or saving a cookie jar.
#[derive(Debug, Error)]
pub enum JarError {
    /// The cookie file could not be read or written.
    #[error("IO error on cookie file {path}: {source}")]
    Io {
        /// The cookie file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The cookie file content is not a valid encoded jar.
    #[error("malformed cookie jar: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The jar could not be encoded.
    #[error("failed to encode cookie jar: {0}")]
    Encode(#[source] serde_json::Error),
}

impl JarError {
    /// Creates an IO error for the given cookie file.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when the error means the cookie file does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
