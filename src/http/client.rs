//! Stateful HTTP client with a persistent cookie jar.
//!
//! Every constructor converges on one private `build` function taking an
//! optional proxy route, an optional cookie file and the timeouts.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Response};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::ClientError;
use crate::config::ClientConfig;
use crate::jar::CookieJar;
use crate::proxy::ProxyDialer;
use crate::user_agent;

/// Content type used for [`HttpClient::post`] bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP client that keeps cookies per host and optionally persists them.
///
/// Clones share the same jar, transport and cookie file, so one client can be
/// handed to many tasks.
///
/// # Example
///
/// ```no_run
/// use jarhttp::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::with_cookie_file("cookies.json");
/// client.post("https://example.com/login", &[("user", "me"), ("pass", "pw")]).await?;
/// let page = client.get("https://example.com/account").await?;
/// println!("{page}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    jar: Arc<CookieJar>,
    cookie_path: Option<PathBuf>,
    save_lock: Arc<Mutex<()>>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Timeouts {
    request: Option<Duration>,
    connect: Option<Duration>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a direct client with an in-memory jar.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None, None, Timeouts::default())
    }

    /// Creates a direct client whose jar is loaded from and saved to `path`.
    ///
    /// A missing or malformed file yields an empty jar (malformed files are
    /// logged). An empty path disables persistence.
    #[must_use]
    pub fn with_cookie_file(path: impl Into<PathBuf>) -> Self {
        Self::build(None, Some(path.into()), Timeouts::default())
    }

    /// Creates a proxied client with an in-memory jar.
    ///
    /// An unusable proxy address is logged and the client connects directly.
    #[must_use]
    pub fn with_proxy(proxy_addr: &str) -> Self {
        Self::build(
            Some(ProxyDialer::from_url(proxy_addr)),
            None,
            Timeouts::default(),
        )
    }

    /// Creates a proxied client whose jar is persisted at `path`.
    #[must_use]
    pub fn with_proxy_and_cookie_file(path: impl Into<PathBuf>, proxy_addr: &str) -> Self {
        Self::build(
            Some(ProxyDialer::from_url(proxy_addr)),
            Some(path.into()),
            Timeouts::default(),
        )
    }

    /// Creates a client from a [`ClientConfig`], including optional timeouts.
    ///
    /// Like the other constructors this never fails; use
    /// [`try_from_config`](Self::try_from_config) to surface build errors.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::build(
            config.proxy.as_deref().map(ProxyDialer::from_url),
            config.cookie_file.clone(),
            timeouts_of(config),
        )
    }

    /// Creates a client from a [`ClientConfig`] without any fallback.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] if reqwest rejects the configuration.
    /// Proxy address problems are still handled by falling back to a direct
    /// route.
    pub fn try_from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let dialer = config.proxy.as_deref().map(ProxyDialer::from_url);
        let (jar, cookie_path) = hydrate_jar(config.cookie_file.clone());
        let client = base_client_builder(&jar, dialer.as_ref(), timeouts_of(config))
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self::assemble(client, jar, cookie_path))
    }

    /// Shared constructor behind every public one.
    ///
    /// # Panics
    ///
    /// Panics if even the minimal fallback client cannot be built, which only
    /// happens when the TLS backend fails to initialize.
    #[allow(clippy::expect_used)]
    fn build(dialer: Option<ProxyDialer>, cookie_path: Option<PathBuf>, timeouts: Timeouts) -> Self {
        let (jar, cookie_path) = hydrate_jar(cookie_path);
        let client = match base_client_builder(&jar, dialer.as_ref(), timeouts).build() {
            Ok(client) => client,
            Err(error) => {
                warn!(
                    error = %error,
                    "HTTP client configuration rejected; retrying with a direct default client"
                );
                base_client_builder(&jar, Some(&ProxyDialer::direct()), Timeouts::default())
                    .build()
                    .expect("failed to build HTTP client with default configuration")
            }
        };
        Self::assemble(client, jar, cookie_path)
    }

    fn assemble(client: Client, jar: Arc<CookieJar>, cookie_path: Option<PathBuf>) -> Self {
        Self {
            client,
            jar,
            cookie_path,
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Sends a GET request and returns the full response body.
    ///
    /// Any status code counts as success. On success the jar is saved to the
    /// cookie file (if configured); save failures are only logged.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] for malformed URLs,
    /// [`ClientError::Request`] for transport failures and
    /// [`ClientError::BodyRead`] when the body cannot be read. The jar is not
    /// saved in those cases.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<String, ClientError> {
        let parsed = parse_url(url)?;
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| ClientError::request(url, e))?;
        self.finish(url, response).await
    }

    /// Sends `form` as an `application/x-www-form-urlencoded` POST body and
    /// returns the full response body.
    ///
    /// Pairs are encoded in order and repeated keys are kept.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    #[instrument(skip(self, form), fields(url = %url, form_fields = form.len()))]
    pub async fn post<K, V>(&self, url: &str, form: &[(K, V)]) -> Result<String, ClientError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let parsed = parse_url(url)?;
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let response = self
            .client
            .post(parsed)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::request(url, e))?;
        self.finish(url, response).await
    }

    /// Returns the shared cookie jar.
    #[must_use]
    pub fn jar(&self) -> &Arc<CookieJar> {
        &self.jar
    }

    /// Returns the cookie file path, if persistence is enabled.
    #[must_use]
    pub fn cookie_path(&self) -> Option<&Path> {
        self.cookie_path.as_deref()
    }

    /// Reads the body (consuming and releasing the response either way), then
    /// saves the jar.
    async fn finish(&self, url: &str, response: Response) -> Result<String, ClientError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::body_read(url, e))?;
        debug!(status = status.as_u16(), bytes = bytes.len(), "response received");

        self.save_jar().await;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Best-effort save of the jar; errors are logged, never returned.
    async fn save_jar(&self) {
        let Some(path) = self.cookie_path.as_deref() else {
            return;
        };

        // Snapshot inside the lock so the last writer always holds the newest jar.
        let _guard = self.save_lock.lock().await;
        match self.jar.save(path).await {
            Ok(()) => debug!(path = %path.display(), cookies = self.jar.len(), "saved cookie jar"),
            Err(error) => warn!(
                path = %path.display(),
                error = %error,
                "failed to save cookie jar; request result unaffected"
            ),
        }
    }
}

fn parse_url(url: &str) -> Result<Url, ClientError> {
    Url::parse(url).map_err(|_| ClientError::invalid_url(url))
}

fn timeouts_of(config: &ClientConfig) -> Timeouts {
    Timeouts {
        request: config.timeout(),
        connect: config.connect_timeout(),
    }
}

/// Loads the jar for `cookie_path`, treating an empty path as no persistence.
fn hydrate_jar(cookie_path: Option<PathBuf>) -> (Arc<CookieJar>, Option<PathBuf>) {
    let cookie_path = cookie_path.filter(|path| !path.as_os_str().is_empty());
    let jar = match cookie_path.as_deref() {
        Some(path) => CookieJar::load_or_default(path),
        None => CookieJar::new(),
    };
    (Arc::new(jar), cookie_path)
}

fn base_client_builder(
    jar: &Arc<CookieJar>,
    dialer: Option<&ProxyDialer>,
    timeouts: Timeouts,
) -> ClientBuilder {
    let mut builder = Client::builder()
        .cookie_provider(Arc::clone(jar))
        .gzip(true)
        .user_agent(user_agent::default_user_agent());
    if let Some(dialer) = dialer {
        builder = dialer.apply(builder);
    }
    if let Some(timeout) = timeouts.request {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = timeouts.connect {
        builder = builder.connect_timeout(timeout);
    }
    builder
}
