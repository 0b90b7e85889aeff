//! HTTP requests over a shared, optionally persistent cookie jar.
//!
//! # Features
//!
//! - GET and form-encoded POST returning the whole body as text
//! - Cookies from `Set-Cookie` headers are stored per host and replayed
//! - Jar saved to the cookie file after every successful request
//! - Optional SOCKS5/HTTP proxy with direct fallback
//! - No timeouts unless configured through [`ClientConfig`](crate::ClientConfig)

mod client;
mod error;

pub use client::{FORM_CONTENT_TYPE, HttpClient};
pub use error::ClientError;

// Note: no module-local Result alias; use `Result<T, ClientError>` explicitly.
