//! Scholarly API clients.
//!
//! Both clients share one HTTP core with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff
//! - Rate limiting (one request per configured interval, polite pool etiquette)
//! - Response caching with 5-minute TTL

mod crossref;
mod middleware;
mod openalex;

use std::sync::Arc;
use std::time::Duration;

use governor::DefaultDirectRateLimiter;
use moka::future::Cache;
use reqwest_middleware::ClientWithMiddleware;

pub use crossref::{CrossrefClient, crossref_date_filter, is_issn};
pub use openalex::{OpenAlexClient, WorkQuery, encode_doi_path};

use crate::config::Config;
use crate::error::{ClientError, ClientResult};

/// HTTP plumbing shared by the API clients and the page scraper.
#[derive(Clone)]
pub(crate) struct HttpCore {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Response cache, disabled when the configured size is zero.
    cache: Option<Cache<String, serde_json::Value>>,

    /// Request pacing, disabled when the configured interval is zero.
    limiter: Option<Arc<DefaultDirectRateLimiter>>,

    /// Request timeout, reported on timeouts.
    timeout: Duration,

    /// Name used in log fields.
    service: &'static str,
}

impl HttpCore {
    /// Build the core for one upstream service.
    pub(crate) fn new(config: &Config, service: &'static str) -> anyhow::Result<Self> {
        let client = middleware::build_client(config)?;

        let cache = (config.cache_max_size > 0).then(|| {
            Cache::builder()
                .max_capacity(config.cache_max_size)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            client,
            cache,
            limiter: middleware::build_rate_limiter(config.rate_limit_interval),
            timeout: config.request_timeout,
            service,
        })
    }

    /// Make a GET request and decode the JSON body.
    pub(crate) async fn get<T>(&self, url: &str, params: &[(String, String)]) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        // Check cache
        let cache_key = cache_key("GET", url, params);
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::debug!(service = self.service, url, "cache hit");
                return serde_json::from_value(cached).map_err(ClientError::from);
            }
        }

        self.pace().await;

        tracing::debug!(service = self.service, url, params = ?params, "GET");
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let response = handle_response(response).await?;
        let value: serde_json::Value = response.json().await?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, value.clone()).await;
        }

        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Fetch a page body as text. Never cached or rate limited.
    pub(crate) async fn get_text(&self, url: &str) -> ClientResult<String> {
        let response = self.client.get(url).send().await.map_err(|e| self.map_send_error(e))?;
        let response = handle_response(response).await?;
        Ok(response.text().await?)
    }

    /// Wait for the rate limiter.
    async fn pace(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    fn map_send_error(&self, err: reqwest_middleware::Error) -> ClientError {
        match err {
            reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => ClientError::Timeout(self.timeout),
            reqwest_middleware::Error::Reqwest(e) => ClientError::Http(e),
            other => ClientError::Middleware(other),
        }
    }
}

impl std::fmt::Debug for HttpCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCore")
            .field("service", &self.service)
            .field("cached", &self.cache.is_some())
            .field("rate_limited", &self.limiter.is_some())
            .finish()
    }
}

/// Handle API response status codes.
async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            Err(ClientError::rate_limited(retry_after))
        }
        404 => {
            let url = response.url().path().to_string();
            Err(ClientError::not_found(url))
        }
        400 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::bad_request(text))
        }
        500..=599 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::server(status.as_u16(), text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
        }
    }
}

/// Generate cache key.
fn cache_key(method: &str, url: &str, params: &[(String, String)]) -> String {
    use md5::{Digest, Md5};

    let mut hasher = Md5::new();
    hasher.update(method.as_bytes());
    hasher.update(b"|");
    hasher.update(url.as_bytes());
    hasher.update(b"|");

    for (k, v) in params {
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
        hasher.update(b"&");
    }

    format!("{:x}", hasher.finalize())
}
