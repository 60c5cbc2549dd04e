//! In-memory market data for tests and dry runs.
//!
//! Implements every market data port from values set by the caller. Chain
//! responses can be scripted per call so a monitor run can be replayed
//! cycle by cycle.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};

use crate::application::ports::{
    ChainsByExpiry, MarketDataError, OptionChainPort, RatePoint, RiskFreeRatePort, SpotPricePort,
};
use crate::domain::strike_selection::OptionChain;

/// In-memory implementation of the market data ports.
#[derive(Debug, Default)]
pub struct InMemoryMarketData {
    spots: RwLock<HashMap<String, f64>>,
    chains: RwLock<HashMap<String, ChainsByExpiry>>,
    scripted: Mutex<HashMap<String, VecDeque<Result<OptionChain, MarketDataError>>>>,
    rates: RwLock<HashMap<String, Vec<RatePoint>>>,
    chain_requests: AtomicUsize,
}

impl InMemoryMarketData {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spot price of `symbol`.
    pub fn set_spot(&self, symbol: &str, price: f64) {
        self.spots.write().insert(symbol.to_string(), price);
    }

    /// Set (or replace) the chain of `underlying` for the chain's expiry.
    pub fn set_chain(&self, underlying: &str, chain: OptionChain) {
        self.chains
            .write()
            .entry(key(underlying))
            .or_default()
            .insert(chain.expiry, chain);
    }

    /// Queue a response for the next chain request of `underlying`.
    ///
    /// Queued responses are served in order before falling back to the
    /// chains set with [`Self::set_chain`]. A queued chain also replaces the
    /// stored one.
    pub fn push_chain_response(
        &self,
        underlying: &str,
        response: Result<OptionChain, MarketDataError>,
    ) {
        self.scripted
            .lock()
            .entry(key(underlying))
            .or_default()
            .push_back(response);
    }

    /// Set the observations of a rate series.
    pub fn set_rates(&self, series_id: &str, points: Vec<RatePoint>) {
        self.rates.write().insert(series_id.to_string(), points);
    }

    /// Number of chain requests served so far.
    #[must_use]
    pub fn chain_requests(&self) -> usize {
        self.chain_requests.load(Ordering::Relaxed)
    }
}

fn key(underlying: &str) -> String {
    underlying.trim().to_ascii_uppercase()
}

#[async_trait]
impl SpotPricePort for InMemoryMarketData {
    async fn get_spot_price(&self, symbol: &str) -> Result<f64, MarketDataError> {
        self.spots
            .read()
            .get(symbol)
            .copied()
            .ok_or_else(|| MarketDataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}

#[async_trait]
impl OptionChainPort for InMemoryMarketData {
    async fn get_option_chain(
        &self,
        underlying: &str,
        expiry: Option<NaiveDate>,
    ) -> Result<ChainsByExpiry, MarketDataError> {
        self.chain_requests.fetch_add(1, Ordering::Relaxed);
        let underlying = key(underlying);

        let scripted = self
            .scripted
            .lock()
            .get_mut(&underlying)
            .and_then(VecDeque::pop_front);
        if let Some(response) = scripted {
            let chain = response?;
            self.set_chain(&underlying, chain);
        }

        let chains = self.chains.read();
        let all = chains
            .get(&underlying)
            .ok_or_else(|| MarketDataError::SymbolNotFound {
                symbol: underlying.clone(),
            })?;

        match expiry {
            None => Ok(all.clone()),
            Some(expiry) => all
                .get(&expiry)
                .map(|chain| BTreeMap::from([(expiry, chain.clone())]))
                .ok_or_else(|| {
                    MarketDataError::unavailable(format!("no {underlying} options expiring {expiry}"))
                }),
        }
    }
}

#[async_trait]
impl RiskFreeRatePort for InMemoryMarketData {
    async fn get_risk_free_rate(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RatePoint>, MarketDataError> {
        let rates = self.rates.read();
        let points = rates.get(series_id).ok_or_else(|| {
            MarketDataError::unavailable(format!("series {series_id} not loaded"))
        })?;
        Ok(points
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .copied()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strike_selection::ChainRow;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
    }

    fn chain(day: u32, strike: f64) -> OptionChain {
        OptionChain::new(date(day), vec![ChainRow::new(strike)])
    }

    #[tokio::test]
    async fn spot_round_trip_and_unknown_symbol() {
        let store = InMemoryMarketData::new();
        store.set_spot("ETH-USD-PERP", 3011.0);

        assert_eq!(store.get_spot_price("ETH-USD-PERP").await, Ok(3011.0));
        assert!(matches!(
            store.get_spot_price("BTC-USD-PERP").await,
            Err(MarketDataError::SymbolNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn chains_filter_by_expiry() {
        let store = InMemoryMarketData::new();
        store.set_chain("eth", chain(13, 3000.0));
        store.set_chain("ETH", chain(27, 3200.0));

        let all = store.get_option_chain("ETH", None).await.unwrap();
        assert_eq!(all.len(), 2);

        let one = store.get_option_chain("ETH", Some(date(27))).await.unwrap();
        assert_eq!(one[&date(27)].rows[0].strike, 3200.0);

        assert!(store.get_option_chain("ETH", Some(date(20))).await.is_err());
        assert_eq!(store.chain_requests(), 3);
    }

    #[tokio::test]
    async fn scripted_responses_play_in_order() {
        let store = InMemoryMarketData::new();
        store.set_chain("ETH", chain(13, 3000.0));
        store.push_chain_response("ETH", Err(MarketDataError::unavailable("exchange down")));
        store.push_chain_response("ETH", Ok(chain(13, 3100.0)));

        assert!(store.get_option_chain("ETH", Some(date(13))).await.is_err());

        let second = store.get_option_chain("ETH", Some(date(13))).await.unwrap();
        assert_eq!(second[&date(13)].rows[0].strike, 3100.0);

        // queue drained: the last scripted chain stays current
        let third = store.get_option_chain("ETH", Some(date(13))).await.unwrap();
        assert_eq!(third[&date(13)].rows[0].strike, 3100.0);
    }

    #[tokio::test]
    async fn rates_filter_by_window() {
        let store = InMemoryMarketData::new();
        store.set_rates(
            "DGS3MO",
            vec![
                RatePoint {
                    date: date(2),
                    rate_percent: 4.3,
                },
                RatePoint {
                    date: date(10),
                    rate_percent: 4.2,
                },
            ],
        );

        let points = store
            .get_risk_free_rate("DGS3MO", date(5), date(12))
            .await
            .unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].rate_percent, 4.2);

        assert!(store.get_risk_free_rate("DTB3", date(5), date(12)).await.is_err());
    }
}
