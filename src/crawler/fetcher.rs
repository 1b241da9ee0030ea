//! Fetches one document per call under the crawl policy.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info};

use super::RateLimiter;
use crate::config::CrawlConfig;
use crate::error::FetchError;
use crate::retry::{retry, RetryConfig};

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Failure below the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Timeout,
    Connection(String),
    /// The request could not be built or sent at all
    Request(String),
}

/// Seam between the fetcher and the network
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport carrying the identifying request header
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &CrawlConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        Ok(TransportResponse { status, body })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() || e.is_body() || e.is_request() {
        TransportError::Connection(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}

/// Classify a completed exchange
fn classify(url: &str, response: TransportResponse) -> Result<String, FetchError> {
    match response.status {
        200..=299 => Ok(response.body),
        429 => Err(FetchError::Blocked {
            url: url.to_string(),
            status: response.status,
        }),
        500..=599 => Err(FetchError::Transient {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status),
        }),
        status => Err(FetchError::Permanent {
            url: url.to_string(),
            reason: format!("HTTP {}", status),
        }),
    }
}

fn classify_transport(url: &str, error: TransportError) -> FetchError {
    match error {
        TransportError::Timeout => FetchError::Transient {
            url: url.to_string(),
            reason: "timeout".to_string(),
        },
        TransportError::Connection(reason) => FetchError::Transient {
            url: url.to_string(),
            reason,
        },
        TransportError::Request(reason) => FetchError::Permanent {
            url: url.to_string(),
            reason,
        },
    }
}

/// Document fetcher
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
}

impl Fetcher {
    /// Create a fetcher over HTTP using the crawl policy
    pub fn new(config: &CrawlConfig) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), config.retry()))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    /// Fetch a document, pacing through `limiter` on every attempt.
    ///
    /// Exhausted retries come back as an ordinary `Err`.
    pub async fn fetch(&self, url: &str, limiter: &RateLimiter) -> Result<String, FetchError> {
        let result = retry(&self.retry, url, || async {
            limiter.acquire().await;
            debug!("GET {}", url);
            match self.transport.get(url).await {
                Ok(response) => classify(url, response),
                Err(e) => Err(classify_transport(url, e)),
            }
        })
        .await;

        if let Ok(body) = &result {
            info!("Fetched {} ({} bytes)", url, body.len());
        }
        result
    }
}
