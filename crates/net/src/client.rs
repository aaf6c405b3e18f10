//! HTTP client with connection pooling and retry logic

use futures::StreamExt;
use modhost_config::Config;
use modhost_errors::{Error, NetworkError};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// Per-request budget for registry calls
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub retry_count: u32,
    pub retry_delay: Duration,
    /// Largest artifact body accepted
    pub max_body_size: u64,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            retry_count: 3,
            retry_delay: Duration::from_secs(1),
            max_body_size: 256 * 1024 * 1024,
            user_agent: format!("modhost/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl NetConfig {
    /// Build from the `[network]` section
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.request_timeout(),
            retry_count: config.network.retries,
            retry_delay: Duration::from_secs(config.network.retry_delay),
            max_body_size: config.network.max_artifact_size,
            ..Self::default()
        }
    }
}

/// HTTP client wrapper with retry logic
#[derive(Clone, Debug)]
pub struct NetClient {
    client: Client,
    config: NetConfig,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ConnectionRefused(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(NetConfig::default())
    }

    #[must_use]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// GET with retries and the per-request timeout
    ///
    /// `authorization` is sent verbatim when present. Non-success statuses
    /// are turned into errors.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` for non-success statuses or a network error if the
    /// request fails after all retries.
    pub async fn get(
        &self,
        url: &url::Url,
        query: &[(&str, String)],
        authorization: Option<&str>,
    ) -> Result<Response, Error> {
        let response = self
            .retry_request(|| {
                let mut request = self
                    .client
                    .get(url.clone())
                    .query(query)
                    .timeout(self.config.timeout);
                if let Some(token) = authorization {
                    request = request.header(reqwest::header::AUTHORIZATION, token);
                }
                request
            })
            .await?;
        Self::ensure_success(response)
    }

    /// Download a body into memory, enforcing the size limit
    ///
    /// No per-request timeout is applied; callers bound the whole transfer.
    ///
    /// # Errors
    ///
    /// Returns `ResponseTooLarge` when the body exceeds the limit, `HttpError`
    /// for non-success statuses, or a network error on transfer failure.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, Error> {
        let parsed = crate::parse_url(url)?;
        let response = self.retry_request(|| self.client.get(parsed.clone())).await?;
        let response = Self::ensure_success(response)?;

        let limit = self.config.max_body_size;
        if let Some(size) = response.content_length() {
            if size > limit {
                return Err(NetworkError::ResponseTooLarge { size, limit }.into());
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| NetworkError::DownloadFailed(e.to_string()))?;
            let size = (body.len() + chunk.len()) as u64;
            if size > limit {
                return Err(NetworkError::ResponseTooLarge { size, limit }.into());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    fn ensure_success(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(NetworkError::HttpError {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            }
            .into())
        }
    }

    /// Execute a request with retries
    ///
    /// Transport errors and 5xx responses are retried with a linearly
    /// growing delay. A 429 carrying `retry-after` stops immediately.
    async fn retry_request<F>(&self, mut build: F) -> Result<Response, Error>
    where
        F: FnMut() -> RequestBuilder,
    {
        let attempts = self.config.retry_count + 1;
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_delay * attempt).await;
            }
            attempt += 1;
            let last = attempt == attempts;

            let error = match build().send().await {
                Ok(response) => {
                    if let Some(seconds) = retry_after(&response) {
                        return Err(NetworkError::RateLimited { seconds }.into());
                    }
                    if response.status().is_server_error() && !last {
                        continue;
                    }
                    return Ok(response);
                }
                Err(e) => e,
            };

            if last || !is_transient(&error) {
                return Err(transport_error(&error).into());
            }
        }
    }
}

fn retry_after(response: &Response) -> Option<u64> {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.status().is_none_or(|s| s.is_server_error())
}

fn transport_error(error: &reqwest::Error) -> NetworkError {
    if error.is_timeout() {
        NetworkError::Timeout {
            url: error.url().map(ToString::to_string).unwrap_or_default(),
        }
    } else if error.is_connect() {
        NetworkError::ConnectionRefused(error.to_string())
    } else {
        NetworkError::DownloadFailed(error.to_string())
    }
}
