//! HTTP client with rate limiting for the OpenWebif JSON API
//!
//! Set-top boxes are slow and single-tasked, so requests are spaced out and
//! transient failures are retried with exponential backoff.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Result, XmltvError};

/// Maximum number of retry attempts for transient errors
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_RETRY_DELAY_MS: u64 = 1000;

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart
/// to avoid overwhelming the receiver.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// # Example
    /// ```
    /// use owi_xmltv_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 2 requests per second
    /// assert_eq!(limiter.min_interval().as_millis(), 500);
    /// ```
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_second);
        let now = Instant::now();
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(now.checked_sub(min_interval).unwrap_or(now))),
        }
    }

    /// Wait until the next request is allowed.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Connection settings for the receiver
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Receiver host name or IP (default: localhost)
    pub host: String,
    /// OpenWebif port (default: 80)
    pub port: u16,
    /// Optional OpenWebif user
    pub username: Option<String>,
    /// Password of `username`
    pub password: Option<String>,
    /// Maximum requests per second (default: 10.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 80,
            username: None,
            password: None,
            requests_per_second: 10.0,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Root URL of the API, with credentials when a user is configured.
    ///
    /// Picon URLs in the document are built from this root.
    pub fn api_root(&self) -> String {
        match self.username.as_deref().filter(|user| !user.is_empty()) {
            Some(user) => format!(
                "http://{}:{}@{}:{}",
                user,
                self.password.as_deref().unwrap_or_default(),
                self.host,
                self.port
            ),
            None => self.base_url(),
        }
    }

    /// Root URL without credentials, used for requests.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// HTTP client for OpenWebif with rate limiting and retry logic
///
/// This client automatically:
/// - Limits request rate to avoid overloading the receiver
/// - Retries on transient errors (429, 5xx) with exponential backoff
/// - Sends basic auth when a user is configured
pub struct OpenWebifClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Rate limiter for request throttling
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl OpenWebifClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created or the request
    /// rate is not positive
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        if !(config.requests_per_second > 0.0) {
            return Err(XmltvError::ApiError(format!(
                "requests per second must be positive, got {}",
                config.requests_per_second
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let rate_limiter = RateLimiter::new(config.requests_per_second);

        Ok(Self {
            client,
            rate_limiter,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch and decode a JSON document from an API path
    ///
    /// # Arguments
    /// * `path` - Path and query below the root (e.g., "/api/bouquets")
    ///
    /// # Errors
    /// - `XmltvError::HttpError` - Network or HTTP error after all retries
    /// - `XmltvError::RateLimited` - Server returned 429 after all retries
    /// - `XmltvError::NotFound` - Server returned 404
    /// - `XmltvError::ApiError` - Body is not the expected JSON
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.fetch(path).await?;
        serde_json::from_str(&body).map_err(|e| XmltvError::ApiError(format!("{}: {}", path, e)))
    }

    /// Fetch the raw body of an API path, retrying transient failures
    pub async fn fetch(&self, path: &str) -> Result<String> {
        if !path.starts_with('/') {
            return Err(XmltvError::InvalidUrl(path.to_string()));
        }
        let url = format!("{}{}", self.config.base_url(), path);

        let mut attempt = 0;
        loop {
            // Wait for rate limiter before making request
            self.rate_limiter.acquire().await;
            debug!(%url, attempt, "GET");

            let mut request = self.client.get(&url);
            if let Some(user) = self.config.username.as_deref().filter(|u| !u.is_empty()) {
                request = request.basic_auth(user, self.config.password.as_deref());
            }
            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.text().await?);
            }

            // Handle 404 - Not Found (no retry)
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(XmltvError::NotFound(path.to_string()));
            }

            let transient =
                status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if transient && attempt < MAX_RETRIES {
                let delay = self.calculate_backoff_delay(attempt);
                warn!(%url, %status, delay_ms = delay.as_millis() as u64, "Retrying request");
                sleep(delay).await;
                attempt += 1;
                continue;
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(XmltvError::RateLimited);
            }
            return match response.error_for_status() {
                Err(e) => Err(XmltvError::HttpError(e)),
                Ok(_) => Err(XmltvError::ApiError(format!("{} answered {}", path, status))),
            };
        }
    }

    /// Calculate exponential backoff delay for retry
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        // Exponential backoff: 1s, 2s, 4s, ...
        let delay_ms = BASE_RETRY_DELAY_MS * 2u64.pow(attempt);
        Duration::from_millis(delay_ms)
    }

    /// Get a reference to the rate limiter (for testing)
    #[cfg(test)]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}
