//! Cookie record and `Set-Cookie` header parsing.
//!
//! Only the name takes part in matching. Every other attribute is carried
//! as received so it survives a save/load cycle, but none of them is
//! enforced (no expiry eviction, no domain or path matching).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cookie stored in the jar.
///
/// The value field is redacted in Debug output to prevent accidental logging
/// of session tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name; unique within one host's sequence.
    pub name: String,
    /// Cookie value (sensitive, never log).
    value: String,
    /// `Path` attribute, if the server sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// `Domain` attribute, if the server sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Raw `Expires` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    /// `Max-Age` attribute in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    /// Whether the `Secure` flag was present.
    #[serde(default, skip_serializing_if = "is_false")]
    pub secure: bool,
    /// Whether the `HttpOnly` flag was present.
    #[serde(default, skip_serializing_if = "is_false")]
    pub http_only: bool,
    /// Raw `SameSite` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Cookie {
    /// Creates a cookie with only a name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            expires: None,
            max_age: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    /// Returns the cookie value.
    ///
    /// Cookie values are sensitive; avoid logging the return value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Parses one `Set-Cookie` header value.
    ///
    /// Returns `None` when the header has no `name=value` pair or the name is
    /// empty. Unknown attributes are ignored.
    #[must_use]
    pub fn parse_set_cookie(header: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Self::new(name, strip_quotes(value.trim()));
        for attribute in parts {
            let attribute = attribute.trim();
            let (key, val) = match attribute.split_once('=') {
                Some((key, val)) => (key.trim(), Some(val.trim())),
                None => (attribute, None),
            };
            match (key.to_ascii_lowercase().as_str(), val) {
                ("path", Some(val)) => cookie.path = Some(val.to_string()),
                ("domain", Some(val)) => cookie.domain = Some(val.to_string()),
                ("expires", Some(val)) => cookie.expires = Some(val.to_string()),
                ("max-age", Some(val)) => cookie.max_age = val.parse().ok(),
                ("samesite", Some(val)) => cookie.same_site = Some(val.to_string()),
                ("secure", _) => cookie.secure = true,
                ("httponly", _) => cookie.http_only = true,
                _ => {}
            }
        }
        Some(cookie)
    }

    /// Renders the `name=value` pair sent in a `Cookie` request header.
    #[must_use]
    pub fn pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("path", &self.path)
            .field("domain", &self.domain)
            .field("expires", &self.expires)
            .field("max_age", &self.max_age)
            .field("secure", &self.secure)
            .field("http_only", &self.http_only)
            .field("same_site", &self.same_site)
            .finish()
    }
}
