//! HTTP client for the fixed business catalog endpoint.

use std::time::Duration;

use nearby_core::{AppConfig, BusinessRecord};
use reqwest::Client;

use crate::error::FetchError;
use crate::rate_limit::retry_with_backoff;

/// Client for the catalog endpoint, which serves every business as one
/// JSON array with no paging or query parameters.
///
/// Non-2xx responses and malformed bodies surface as typed [`FetchError`]s.
/// Transient failures (429, 5xx, network) are retried with exponential
/// backoff up to `max_retries` additional attempts; the default of `0`
/// issues exactly one request per fetch.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    catalog_url: reqwest::Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with a request timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if `catalog_url` does not parse.
    /// - [`FetchError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        catalog_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, FetchError> {
        let catalog_url = parse_url(catalog_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            catalog_url,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.catalog_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    #[must_use]
    pub fn catalog_url(&self) -> &str {
        self.catalog_url.as_str()
    }

    /// Fetches the full catalog, preserving the order served by the endpoint.
    ///
    /// # Errors
    ///
    /// - [`FetchError::RateLimited`] for HTTP 429 after retries are exhausted.
    /// - [`FetchError::NotFound`] for HTTP 404.
    /// - [`FetchError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`FetchError::Http`] for network or TLS failures.
    /// - [`FetchError::Deserialize`] when the body is not a JSON array of businesses.
    pub async fn fetch_all(&self) -> Result<Vec<BusinessRecord>, FetchError> {
        let url = self.catalog_url.as_str();

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .header(reqwest::header::CACHE_CONTROL, "no-cache")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(FetchError::RateLimited {
                    url: url.to_owned(),
                    retry_after_secs,
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(FetchError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            let body = response.text().await?;
            let records = parse_catalog(&body, url)?;
            tracing::debug!(url, count = records.len(), "fetched business catalog");
            Ok(records)
        })
        .await
    }
}

pub(crate) fn parse_url(raw: &str) -> Result<reqwest::Url, FetchError> {
    let url = reqwest::Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl {
            url: raw.to_owned(),
            reason: format!("unsupported scheme \"{other}\""),
        }),
    }
}

fn parse_catalog(body: &str, url: &str) -> Result<Vec<BusinessRecord>, FetchError> {
    serde_json::from_str::<Vec<BusinessRecord>>(body).map_err(|e| FetchError::Deserialize {
        context: format!("business catalog from {url}"),
        source: e,
    })
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
