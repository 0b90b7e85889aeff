//! jarhttp core library
//!
//! A small stateful HTTP client: cookies received from a host are kept in a
//! per-host jar, replayed on later requests to that host, and optionally saved
//! to a JSON file after every request so sessions survive restarts. All
//! traffic can be routed through a SOCKS5 or HTTP proxy.
//!
//! # Architecture
//!
//! - [`jar`] - Per-host cookie jar with upsert-by-name semantics and JSON encoding
//! - [`proxy`] - Proxy route construction with direct fallback
//! - [`http`] - The [`HttpClient`] wrapper tying transport, jar and persistence together
//! - [`config`] - Client configuration from file and environment

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod http;
pub mod jar;
pub mod proxy;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::ClientConfig;
pub use http::{ClientError, HttpClient};
pub use jar::{Cookie, CookieJar, JarError};
pub use proxy::{ProxyDialer, ProxyError};
