//! Market inputs shared by the one-shot use cases: expiry choice and the
//! risk-free rate with its default.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::application::ports::{
    ChainsByExpiry, MarketDataError, RiskFreeRatePort, latest_risk_free_rate,
};
use crate::domain::strike_selection::OptionChain;

/// Chain for `requested`, or the earliest expiry when `None`.
///
/// # Errors
///
/// `DataUnavailable` when the requested expiry is absent, there are no
/// expiries at all, or the chosen chain has no rows.
pub fn choose_chain(
    mut chains: ChainsByExpiry,
    requested: Option<NaiveDate>,
) -> Result<OptionChain, MarketDataError> {
    let expiry = match requested {
        Some(expiry) => {
            if !chains.contains_key(&expiry) {
                let available: Vec<String> = chains.keys().map(ToString::to_string).collect();
                return Err(MarketDataError::unavailable(format!(
                    "expiry {expiry} not found; available: [{}]",
                    available.join(", ")
                )));
            }
            expiry
        }
        None => *chains
            .keys()
            .next()
            .ok_or_else(|| MarketDataError::unavailable("no expiries available"))?,
    };

    let chain = chains
        .remove(&expiry)
        .ok_or_else(|| MarketDataError::unavailable(format!("no chain for {expiry}")))?;
    if chain.is_empty() {
        return Err(MarketDataError::unavailable(format!(
            "no option quotes for expiry {expiry}"
        )));
    }
    Ok(chain)
}

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Latest observation of the configured series.
    Observed {
        /// Observation date.
        as_of: NaiveDate,
    },
    /// Configured default after a fetch failure or an empty series.
    Default,
}

/// Annualized decimal rate plus its source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedRate {
    /// Rate as a decimal (0.045 = 4.5%).
    pub rate: f64,
    /// Where it came from.
    pub source: RateSource,
}

/// Series lookup parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLookup {
    /// Series identifier (e.g. "DGS3MO").
    pub series_id: String,
    /// Days back from the evaluation date to request.
    pub lookback_days: u32,
    /// Rate used when nothing usable comes back.
    pub default_rate: f64,
}

impl RateLookup {
    /// Resolve the latest rate as of `today`, falling back to the default.
    pub async fn resolve<R: RiskFreeRatePort>(&self, port: &R, today: NaiveDate) -> ResolvedRate {
        let start = today
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .unwrap_or(today);

        match port.get_risk_free_rate(&self.series_id, start, today).await {
            Ok(points) => {
                if let Some(latest) = latest_risk_free_rate(&points) {
                    return ResolvedRate {
                        rate: latest.rate,
                        source: RateSource::Observed {
                            as_of: latest.as_of,
                        },
                    };
                }
                tracing::warn!(
                    series = %self.series_id,
                    default_rate = self.default_rate,
                    "No usable risk-free rate observations; using default"
                );
            }
            Err(e) => {
                tracing::warn!(
                    series = %self.series_id,
                    error = %e,
                    default_rate = self.default_rate,
                    "Failed to fetch risk-free rate; using default"
                );
            }
        }

        ResolvedRate {
            rate: self.default_rate,
            source: RateSource::Default,
        }
    }
}
