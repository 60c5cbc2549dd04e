//! Shared JSON-over-HTTP client for the market data adapters.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::application::ports::MarketDataError;
use crate::observability::record_market_data_request;

/// Thin `reqwest` wrapper that maps failures to [`MarketDataError`] and
/// records request metrics per provider.
#[derive(Debug, Clone)]
pub struct JsonHttpClient {
    client: Client,
    base_url: String,
    provider: &'static str,
    timeout: Duration,
}

impl JsonHttpClient {
    /// Create a client for `provider` rooted at `base_url`.
    pub fn new(
        provider: &'static str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MarketDataError::ConnectionError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            provider,
            timeout,
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `query` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MarketDataError> {
        let started = Instant::now();
        let result = self.fetch(path, query).await;

        let status = match &result {
            Ok(_) => "ok",
            Err(MarketDataError::Timeout { .. }) => "timeout",
            Err(_) => "error",
        };
        record_market_data_request(self.provider, status, started.elapsed().as_secs_f64());

        if let Err(e) = &result {
            tracing::warn!(provider = self.provider, path, error = %e, "Market data request failed");
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MarketDataError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(provider = self.provider, url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::api(format!(
                "{} returned HTTP {}: {}",
                self.provider,
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;
        serde_json::from_str(&text).map_err(|e| {
            MarketDataError::api(format!("{} sent an unexpected body: {e}", self.provider))
        })
    }

    fn transport_error(&self, e: &reqwest::Error) -> MarketDataError {
        if e.is_timeout() {
            MarketDataError::Timeout {
                timeout: self.timeout,
            }
        } else {
            MarketDataError::ConnectionError {
                message: format!("{}: {e}", self.provider),
            }
        }
    }
}

/// Parse an optional numeric string; empty or invalid values become `None`.
pub fn parse_decimal_str(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
