//! HTTP fetch client with exponential-backoff retry
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 300;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const HTTP_TOO_MANY_REQUESTS: u16 = 429;

/// Why a fetch failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Network unreachable, timeout, connection reset
    #[error("transport error: {0}")]
    Transport(String),

    /// HTTP 429
    #[error("rate limit exceeded, please try again later")]
    RateLimited,

    /// Any other non-2xx status
    #[error("HTTP error {status}: {reason}")]
    Http { status: u16, reason: String },

    /// 2xx body that is not valid JSON
    #[error("invalid JSON body: {0}")]
    Decode(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Everything except a malformed URL goes through the retry path
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::InvalidUrl(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::RateLimited => Some(HTTP_TOO_MANY_REQUESTS),
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Status and raw body of one GET
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The network seam of the fetch client
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform a single GET. Only transport-level failures are errors here;
    /// HTTP status handling belongs to the caller.
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// `reqwest`-backed transport
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_defaults() -> anyhow::Result<Self> {
        Self::new(
            concat!("SpaceVision/", env!("CARGO_PKG_VERSION")),
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        )
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_builder() {
                FetchError::InvalidUrl(e.to_string())
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body,
        })
    }
}

/// Retry budget for a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles after each failure
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(DEFAULT_INITIAL_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
        }
    }

    /// Single attempt, no retries
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay before retry number `retry` (0-based)
    pub fn backoff_for(&self, retry: u32) -> Duration {
        self.initial_backoff
            .checked_mul(2u32.saturating_pow(retry))
            .unwrap_or(Duration::MAX)
    }

    /// Sum of every backoff delay when all retries are used
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_retries)
            .map(|retry| self.backoff_for(retry))
            .fold(Duration::ZERO, |acc, d| acc.saturating_add(d))
    }
}

/// GETs JSON documents, retrying failures with exponential backoff
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
}

impl FetchClient {
    pub fn new(transport: Arc<dyn HttpTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Client over `reqwest` with the default retry policy
    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(ReqwestTransport::with_defaults()?),
            RetryPolicy::default(),
        ))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetch with this client's configured policy
    pub async fn fetch_json_default(&self, url: &str) -> Result<Value, FetchError> {
        self.fetch_json(url, self.policy).await
    }

    /// Fetch `url` and parse the body as JSON.
    ///
    /// Up to `policy.max_retries` retries follow the first attempt, sleeping
    /// `initial_backoff * 2^n` before retry `n`. Once the budget is spent the
    /// error of the last attempt is returned.
    pub async fn fetch_json(&self, url: &str, policy: RetryPolicy) -> Result<Value, FetchError> {
        let mut retry = 0;

        loop {
            match self.fetch_attempt(url).await {
                Ok(value) => {
                    tracing::debug!("Fetched {} (retries used: {})", url, retry);
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && retry < policy.max_retries => {
                    let delay = policy.backoff_for(retry);
                    retry += 1;
                    tracing::warn!(
                        "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                        retry,
                        policy.max_retries + 1,
                        url,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to fetch {} after {} attempts: {}",
                        url,
                        retry + 1,
                        e
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Fetch and deserialize into `T`
    pub async fn fetch_as<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let value = self.fetch_json_default(url).await?;
        serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Single attempt with status classification
    async fn fetch_attempt(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.transport.get(url).await?;

        if response.status == HTTP_TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
                reason: response.reason,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
