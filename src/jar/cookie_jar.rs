//! The shared jar and its `reqwest` cookie-store binding.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{Cookie, JarError};

type HostCookies = BTreeMap<String, Vec<Cookie>>;

/// On-disk shape used when encoding.
#[derive(Serialize)]
struct JarFileRef<'a> {
    hosts: &'a HostCookies,
}

/// On-disk shape used when decoding.
#[derive(Deserialize)]
struct JarFile {
    #[serde(default)]
    hosts: HostCookies,
}

/// Per-host cookie jar shared by every request of an [`HttpClient`](crate::HttpClient).
///
/// # Consistency
///
/// All mutation goes through one jar-wide write lock, held for a whole
/// [`set`](Self::set) batch. Reads take the shared side of the same lock, so a
/// reader sees a host's sequence either entirely before or entirely after a
/// batch. Readers get owned clones; records are never mutated in place.
#[derive(Debug, Default)]
pub struct CookieJar {
    hosts: RwLock<HostCookies>,
}

impl CookieJar {
    /// Creates an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts a batch of cookies for `host`.
    ///
    /// A cookie whose name already exists for `host` replaces that entry in
    /// place; otherwise it is appended. The whole batch is applied under a
    /// single lock acquisition.
    pub fn set(&self, host: &str, cookies: impl IntoIterator<Item = Cookie>) {
        let mut hosts = self.write();
        let entries = hosts.entry(host.to_string()).or_default();
        for cookie in cookies {
            match entries.iter_mut().find(|existing| existing.name == cookie.name) {
                Some(existing) => *existing = cookie,
                None => entries.push(cookie),
            }
        }
        if entries.is_empty() {
            hosts.remove(host);
        }
    }

    /// Returns the cookies stored for `host`, or an empty list.
    #[must_use]
    pub fn get(&self, host: &str) -> Vec<Cookie> {
        self.read().get(host).cloned().unwrap_or_default()
    }

    /// Returns every host that currently holds cookies, in sorted order.
    #[must_use]
    pub fn hosts(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Total number of cookies across all hosts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().values().map(Vec::len).sum()
    }

    /// Returns `true` when no host holds a cookie.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns a copy of the full host to cookies mapping.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Vec<Cookie>> {
        self.read().clone()
    }

    /// Encodes the jar as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`JarError::Encode`] if serialization fails.
    pub fn serialize(&self) -> Result<String, JarError> {
        let hosts = self.read();
        serde_json::to_string_pretty(&JarFileRef { hosts: &*hosts }).map_err(JarError::Encode)
    }

    /// Decodes a jar produced by [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// Returns [`JarError::Malformed`] when `text` is not a valid encoded jar.
    pub fn deserialize(text: &str) -> Result<Self, JarError> {
        let file: JarFile = serde_json::from_str(text).map_err(JarError::Malformed)?;
        Ok(Self {
            hosts: RwLock::new(file.hosts),
        })
    }

    /// Reads and decodes a jar from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`JarError::Io`] when the file cannot be read (check
    /// [`JarError::is_not_found`]) or [`JarError::Malformed`] on bad content.
    pub fn load(path: &Path) -> Result<Self, JarError> {
        let text = std::fs::read_to_string(path).map_err(|e| JarError::io(path, e))?;
        Self::deserialize(&text)
    }

    /// Loads a jar from `path`, falling back to an empty jar on any failure.
    ///
    /// A missing file is expected on first use and only logged at debug level.
    /// Unreadable or malformed files are logged as warnings.
    #[must_use]
    #[instrument(level = "debug")]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(jar) => {
                debug!(hosts = jar.hosts().len(), cookies = jar.len(), "loaded cookie jar");
                jar
            }
            Err(error) if error.is_not_found() => {
                debug!("no cookie file yet; starting with an empty jar");
                Self::new()
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "ignoring unusable cookie file; starting with an empty jar"
                );
                Self::new()
            }
        }
    }

    /// Encodes the jar and replaces `path` with it.
    ///
    /// The text is written to a sibling `<path>.tmp` first and then renamed
    /// over `path`, so an interrupted save leaves the previous file intact.
    ///
    /// # Errors
    ///
    /// Returns [`JarError`] if encoding, writing or the rename fails.
    pub async fn save(&self, path: &Path) -> Result<(), JarError> {
        let text = self.serialize()?;
        let staging = staging_path(path);
        if let Err(error) = tokio::fs::write(&staging, text).await {
            return Err(JarError::io(&staging, error));
        }
        if let Err(error) = tokio::fs::rename(&staging, path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(JarError::io(path, error));
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, HostCookies> {
        self.hosts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HostCookies> {
        self.hosts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    PathBuf::from(staging)
}

/// Returns the jar key for `url`: its host, plus the port when it is not the
/// scheme's default.
#[must_use]
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

impl CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let Some(host) = host_key(url) else {
            return;
        };

        let batch: Vec<Cookie> = cookie_headers
            .filter_map(|header| {
                let parsed = header.to_str().ok().and_then(Cookie::parse_set_cookie);
                if parsed.is_none() {
                    debug!(host = %host, "skipping unparsable Set-Cookie header");
                }
                parsed
            })
            .collect();

        if batch.is_empty() {
            return;
        }
        debug!(host = %host, cookies = batch.len(), "storing response cookies");
        self.set(&host, batch);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let host = host_key(url)?;
        let hosts = self.read();
        let pairs: Vec<String> = hosts
            .get(&host)?
            .iter()
            .map(Cookie::pair)
            .filter(|pair| {
                let valid = HeaderValue::from_str(pair).is_ok();
                if !valid {
                    debug!(host = %host, "not sending cookie with a non-header-safe value");
                }
                valid
            })
            .collect();
        if pairs.is_empty() {
            return None;
        }
        HeaderValue::from_str(&pairs.join("; ")).ok()
    }
}
