//! JSON fetching with bounded retry-with-delay semantics.
//!
//! The transport is abstracted behind the [`FetchJson`] trait so the
//! retry policy and everything above it can be exercised against stub
//! transports. [`HttpJson`] is the real implementation: a reqwest
//! client with the site's expected browser headers, an optional
//! authenticated forward proxy, and a fixed request timeout.

use std::error::Error;
use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Proxy};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{error, warn};
use url::Url;

use crate::utils::truncate_for_log;

/// Errors surfaced by a [`FetchJson`] transport.
pub type FetchError = Box<dyn Error + Send + Sync>;

/// Per-request timeout, independent of the retry delay.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A transport that GETs a URL and returns the parsed JSON body.
#[allow(async_fn_in_trait)]
pub trait FetchJson {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

/// Forward proxy settings, fixed for the lifetime of the client.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
}

/// reqwest-backed [`FetchJson`] implementation.
#[derive(Debug, Clone)]
pub struct HttpJson {
    client: Client,
}

impl HttpJson {
    /// Build the HTTP client. All outbound traffic is routed through
    /// the proxy when one is configured; a malformed proxy address is
    /// a construction-time error.
    pub fn new(proxy: Option<&ProxyConfig>) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5,ru;q=0.5"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            ),
        );
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT);

        if let Some(config) = proxy {
            let address = Url::parse(&format!("http://{}:{}", config.host, config.port))?;
            let mut proxy = Proxy::all(address)?;
            if let (Some(user), Some(pass)) = (config.user.as_deref(), config.pass.as_deref()) {
                proxy = proxy.basic_auth(user, pass);
            }
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl FetchJson for HttpJson {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(
                    %url,
                    preview = %truncate_for_log(&body, 200),
                    "Response body is not valid JSON"
                );
                Err(e.into())
            }
        }
    }
}

/// How often and how patiently to retry one request.
///
/// `Default` keeps the historical settings (3 attempts, 6 second
/// delay); the application normally constructs a policy from its own
/// configuration. The delay is applied before every attempt, including
/// the first: it is a throttle against the upstream site, not an error
/// backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(6),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

/// Wraps a [`FetchJson`] transport with a [`RetryPolicy`].
///
/// Exhausting all attempts resolves to `None` ("no data"), never an
/// error: callers treat an empty result as an empty dataset and the
/// run keeps going.
#[derive(Debug)]
pub struct RetryExecutor<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: FetchJson> RetryExecutor<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Fetch `url`, sleeping the policy delay before every attempt.
    pub async fn execute(&self, url: &str) -> Option<Value> {
        let mut attempt = 0u32;

        while attempt < self.policy.max_retries {
            sleep(self.policy.delay).await;

            match self.inner.fetch(url).await {
                Ok(value) => return Some(value),
                Err(e) => {
                    attempt += 1;
                    error!(
                        attempt,
                        max_retries = self.policy.max_retries,
                        %url,
                        error = %e,
                        "Failed to send a request"
                    );
                }
            }
        }

        error!(%url, "Max retries reached for request; returning empty response");
        None
    }
}
