//! FRED Risk-Free Rate Adapter
//!
//! REST implementation of `RiskFreeRatePort` over the St. Louis Fed series
//! observations endpoint. Values are percent; `"."` marks a missing day and
//! is skipped.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::api_types::FredObservations;
use super::http::{JsonHttpClient, parse_decimal_str};
use crate::application::ports::{MarketDataError, RatePoint, RiskFreeRatePort};
use crate::config::MarketDataConfig;

/// FRED REST adapter.
#[derive(Debug, Clone)]
pub struct FredAdapter {
    http: JsonHttpClient,
    api_key: String,
}

impl FredAdapter {
    /// Create an adapter from the market data configuration.
    ///
    /// An empty API key is accepted; every request then fails with
    /// `DataUnavailable` and callers fall back to their default rate.
    pub fn new(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        Self::with_base_url(
            &config.fred.base_url,
            &config.fred.api_key,
            config.request_timeout(),
        )
    }

    /// Create an adapter against an explicit base URL.
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        timeout: std::time::Duration,
    ) -> Result<Self, MarketDataError> {
        Ok(Self {
            http: JsonHttpClient::new("fred", base_url, timeout)?,
            api_key: api_key.trim().to_string(),
        })
    }
}

#[async_trait]
impl RiskFreeRatePort for FredAdapter {
    async fn get_risk_free_rate(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RatePoint>, MarketDataError> {
        if self.api_key.is_empty() {
            return Err(MarketDataError::unavailable("FRED_API_KEY is not set"));
        }

        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        let response: FredObservations = self
            .http
            .get(
                "/fred/series/observations",
                &[
                    ("series_id", series_id),
                    ("api_key", self.api_key.as_str()),
                    ("file_type", "json"),
                    ("observation_start", start.as_str()),
                    ("observation_end", end.as_str()),
                ],
            )
            .await?;

        let total = response.observations.len();
        let mut points: Vec<RatePoint> = response
            .observations
            .iter()
            .filter_map(|obs| {
                let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d").ok()?;
                let rate_percent = parse_decimal_str(Some(obs.value.as_str()))?;
                Some(RatePoint { date, rate_percent })
            })
            .collect();
        points.sort_by_key(|p| p.date);

        tracing::debug!(
            series = series_id,
            observations = total,
            usable = points.len(),
            "Fetched risk-free rate series"
        );
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[tokio::test]
    async fn parses_observations_and_skips_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fred/series/observations"))
            .and(query_param("series_id", "DGS3MO"))
            .and(query_param("api_key", "secret"))
            .and(query_param("file_type", "json"))
            .and(query_param("observation_start", "2026-01-06"))
            .and(query_param("observation_end", "2026-01-20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "observations": [
                    {"date": "2026-01-15", "value": "4.25"},
                    {"date": "2026-01-16", "value": "."},
                    {"date": "2026-01-19", "value": "4.20"}
                ]
            })))
            .mount(&server)
            .await;

        let adapter =
            FredAdapter::with_base_url(&server.uri(), "secret", Duration::from_secs(2)).unwrap();
        let points = adapter
            .get_risk_free_rate("DGS3MO", day(6), day(20))
            .await
            .unwrap();

        assert_eq!(
            points,
            vec![
                RatePoint {
                    date: day(15),
                    rate_percent: 4.25
                },
                RatePoint {
                    date: day(19),
                    rate_percent: 4.20
                },
            ]
        );
    }

    #[tokio::test]
    async fn missing_api_key_is_unavailable_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let adapter = FredAdapter::with_base_url(&server.uri(), " ", Duration::from_secs(2)).unwrap();
        let Err(err) = adapter.get_risk_free_rate("DGS3MO", day(6), day(20)).await else {
            panic!("expected DataUnavailable");
        };
        assert!(err.to_string().contains("FRED_API_KEY"));
    }

    #[tokio::test]
    async fn empty_series_is_ok_and_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"observations": []})))
            .mount(&server)
            .await;

        let adapter =
            FredAdapter::with_base_url(&server.uri(), "secret", Duration::from_secs(2)).unwrap();
        let points = adapter
            .get_risk_free_rate("DGS3MO", day(6), day(20))
            .await
            .unwrap();
        assert!(points.is_empty());
    }

    #[tokio::test]
    async fn bad_request_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error_code": 400,
                "error_message": "Bad Request.  The value for variable api_key is not registered."
            })))
            .mount(&server)
            .await;

        let adapter =
            FredAdapter::with_base_url(&server.uri(), "bogus", Duration::from_secs(2)).unwrap();
        let result = adapter.get_risk_free_rate("DGS3MO", day(6), day(20)).await;
        assert!(matches!(result, Err(MarketDataError::ApiError { .. })));
    }
}
