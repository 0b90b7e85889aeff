//! Per-host cookie jar with JSON persistence.
//!
//! The jar maps a host key (`host[:port]` of the request URL) to an ordered
//! list of cookies. Inserting a cookie whose name already exists for that host
//! replaces it in place; any other cookie is appended.
//!
//! # Example
//!
//! ```
//! use jarhttp::jar::{Cookie, CookieJar};
//!
//! let jar = CookieJar::new();
//! jar.set("example.com", vec![Cookie::new("sid", "1"), Cookie::new("lang", "en")]);
//! jar.set("example.com", vec![Cookie::new("sid", "2")]);
//!
//! let cookies = jar.get("example.com");
//! assert_eq!(cookies.len(), 2);
//! assert_eq!(cookies[0].value(), "2");
//!
//! let restored = CookieJar::deserialize(&jar.serialize().unwrap()).unwrap();
//! assert_eq!(restored.snapshot(), jar.snapshot());
//! ```

mod cookie;
mod cookie_jar;
mod error;

pub use cookie::Cookie;
pub use cookie_jar::{CookieJar, host_key};
pub use error::JarError;
