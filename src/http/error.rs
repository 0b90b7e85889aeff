//! Error types for HTTP requests.

use thiserror::Error;

/// Errors returned by [`HttpClient`](super::HttpClient) requests.
///
/// A non-2xx status is not an error; only transport-level failures are.
/// Cookie persistence failures are never surfaced here.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The request could not be sent or no response arrived
    /// (DNS, connection refused, proxy handshake, TLS, timeout).
    #[error("request to {url} failed: {source}")]
    Request {
        /// The requested URL.
        url: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The response arrived but its body could not be read.
    #[error("failed to read response body from {url}: {source}")]
    BodyRead {
        /// The requested URL.
        url: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a request error from a reqwest error.
    pub fn request(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            url: url.into(),
            source,
        }
    }

    /// Creates a body read error from a reqwest error.
    pub fn body_read(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::BodyRead {
            url: url.into(),
            source,
        }
    }

    /// Returns `true` if the request failed because a configured timeout elapsed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Request { source, .. } | Self::BodyRead { source, .. } => source.is_timeout(),
            Self::InvalidUrl { .. } | Self::Build(_) => false,
        }
    }
}
