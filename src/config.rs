//! Client configuration: JSON file, environment overrides, validation.
//!
//! Precedence when the CLI assembles a config: CLI flags > environment >
//! config file > defaults. Every field is optional; the default is a direct
//! client with an ephemeral jar and no timeouts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Environment variable naming the cookie file.
pub const ENV_COOKIE_FILE: &str = "JARHTTP_COOKIE_FILE";
/// Environment variable naming the proxy URL.
pub const ENV_PROXY: &str = "JARHTTP_PROXY";
/// Environment variable for the overall request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "JARHTTP_TIMEOUT_SECS";
/// Environment variable for the connect timeout in seconds.
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "JARHTTP_CONNECT_TIMEOUT_SECS";

/// Settings used to construct an [`HttpClient`](crate::HttpClient).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Where the cookie jar is loaded from and saved to. `None` keeps the
    /// jar in memory only.
    pub cookie_file: Option<PathBuf>,
    /// Proxy URL (`socks5://`, `socks5h://`, `http://`, `https://`).
    pub proxy: Option<String>,
    /// Overall request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// TCP connect timeout. `None` waits indefinitely.
    pub connect_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Reads a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid config.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file '{}'", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    /// Overrides fields from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a timeout variable is not an integer.
    pub fn with_env(self) -> Result<Self> {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Overrides fields from `lookup`; blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error when a timeout variable is not an integer.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = lookup(ENV_COOKIE_FILE) {
            self.cookie_file = Some(PathBuf::from(path));
        }
        if let Some(proxy) = lookup(ENV_PROXY) {
            self.proxy = Some(proxy);
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = Some(parse_secs(ENV_TIMEOUT_SECS, &value)?);
        }
        if let Some(value) = lookup(ENV_CONNECT_TIMEOUT_SECS) {
            self.connect_timeout_secs = Some(parse_secs(ENV_CONNECT_TIMEOUT_SECS, &value)?);
        }
        Ok(self)
    }

    /// Validates config values.
    ///
    /// # Errors
    ///
    /// Returns an error when a timeout is outside `1..=3600` seconds or the
    /// cookie file path is empty.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("timeout_secs", self.timeout_secs)?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        if self
            .cookie_file
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            bail!("Invalid config value for `cookie_file`: path is empty");
        }
        Ok(())
    }

    /// Overall request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Connect timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .with_context(|| format!("Invalid value for {name}: '{value}' is not a whole number"))
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}
