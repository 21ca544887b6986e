//! Reverse geocoding against a Nominatim-compatible `/reverse` endpoint.

use std::time::Duration;

use nearby_core::{AppConfig, Coordinates};
use reqwest::Client;
use serde::Deserialize;

use crate::catalog::parse_url;
use crate::error::FetchError;

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    display_name: Option<String>,
}

/// Resolves a human-readable address for a coordinate pair.
///
/// The public Nominatim usage policy requires an identifying `User-Agent`,
/// so one is attached to every request.
#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    client: Client,
    base_url: reqwest::Url,
    user_agent: String,
}

impl ReverseGeocoder {
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if `base_url` does not parse.
    /// - [`FetchError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let base_url = parse_url(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            user_agent: user_agent.to_owned(),
        })
    }

    /// # Errors
    ///
    /// See [`ReverseGeocoder::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.geocoder_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    fn reverse_url(&self, coords: Coordinates) -> reqwest::Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &coords.latitude.to_string())
            .append_pair("lon", &coords.longitude.to_string())
            .append_pair("format", "json")
            .append_pair("addressdetails", "1");
        url
    }

    /// Looks up the display address for `coords`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::UnexpectedStatus`] / [`FetchError::NotFound`] for non-2xx responses.
    /// - [`FetchError::Http`] for network failures.
    /// - [`FetchError::Deserialize`] if the body is not JSON.
    /// - [`FetchError::MissingField`] if the response has no `display_name`.
    pub async fn reverse(&self, coords: Coordinates) -> Result<String, FetchError> {
        let url = self.reverse_url(coords);
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Deserialize {
                context: format!("reverse geocode for {url}"),
                source: e,
            })?;

        match parsed.display_name {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => {
                tracing::debug!(%url, "reverse geocode response had no display_name");
                Err(FetchError::MissingField {
                    url: url.to_string(),
                    field: "display_name",
                })
            }
        }
    }
}
