//! Binance European Options Adapter
//!
//! REST implementation of `OptionChainPort`. Three bulk endpoints are joined
//! by contract symbol:
//!
//! - `exchangeInfo`: strike, expiry and side per contract
//! - `ticker`: best bid/ask and volume
//! - `mark`: bid/ask implied volatility and delta
//!
//! Contracts are grouped by expiry date (UTC) and strike.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};

use super::api_types::{BinanceExchangeInfo, BinanceMark, BinanceOptionSymbol, BinanceTicker};
use super::http::{JsonHttpClient, parse_decimal_str};
use crate::application::ports::{ChainsByExpiry, MarketDataError, OptionChainPort};
use crate::config::MarketDataConfig;
use crate::domain::option_position::OptionRight;
use crate::domain::strike_selection::{ChainRow, OptionChain, SideQuote};

/// Binance options REST adapter.
#[derive(Debug, Clone)]
pub struct BinanceOptionsAdapter {
    http: JsonHttpClient,
    quote_asset: String,
}

impl BinanceOptionsAdapter {
    /// Create an adapter from the market data configuration.
    pub fn new(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        Self::with_base_url(
            &config.binance_options.base_url,
            &config.binance_options.quote_asset,
            config.request_timeout(),
        )
    }

    /// Create an adapter against an explicit base URL.
    pub fn with_base_url(
        base_url: &str,
        quote_asset: &str,
        timeout: std::time::Duration,
    ) -> Result<Self, MarketDataError> {
        Ok(Self {
            http: JsonHttpClient::new("binance_options", base_url, timeout)?,
            quote_asset: quote_asset.to_ascii_uppercase(),
        })
    }

    /// Binance underlying pair for an asset: "ETH" becomes "ETHUSDT".
    #[must_use]
    pub fn underlying_pair(&self, underlying: &str) -> String {
        let underlying = underlying.trim().to_ascii_uppercase();
        if underlying.ends_with(&self.quote_asset) {
            underlying
        } else {
            format!("{underlying}{}", self.quote_asset)
        }
    }
}

#[async_trait]
impl OptionChainPort for BinanceOptionsAdapter {
    async fn get_option_chain(
        &self,
        underlying: &str,
        expiry: Option<NaiveDate>,
    ) -> Result<ChainsByExpiry, MarketDataError> {
        let pair = self.underlying_pair(underlying);

        let (info, tickers, marks) = tokio::try_join!(
            self.http
                .get::<BinanceExchangeInfo>("/eapi/v1/exchangeInfo", &[]),
            self.http.get::<Vec<BinanceTicker>>("/eapi/v1/ticker", &[]),
            self.http.get::<Vec<BinanceMark>>("/eapi/v1/mark", &[]),
        )?;

        let contracts: Vec<&BinanceOptionSymbol> = info
            .option_symbols
            .iter()
            .filter(|s| s.underlying == pair)
            .collect();
        if contracts.is_empty() {
            return Err(MarketDataError::SymbolNotFound { symbol: pair });
        }

        let mut chains = build_chains(&contracts, &tickers, &marks);
        tracing::debug!(
            underlying = %pair,
            contracts = contracts.len(),
            expiries = chains.len(),
            "Fetched option chains"
        );

        match expiry {
            None => Ok(chains),
            Some(expiry) => match chains.remove(&expiry) {
                Some(chain) => Ok(BTreeMap::from([(expiry, chain)])),
                None => {
                    let available: Vec<String> = chains.keys().map(ToString::to_string).collect();
                    Err(MarketDataError::unavailable(format!(
                        "no {pair} options expiring {expiry}; available: [{}]",
                        available.join(", ")
                    )))
                }
            },
        }
    }
}

/// Join contracts with their ticker and mark and group by expiry and strike.
fn build_chains(
    contracts: &[&BinanceOptionSymbol],
    tickers: &[BinanceTicker],
    marks: &[BinanceMark],
) -> ChainsByExpiry {
    let ticker_map: HashMap<&str, &BinanceTicker> =
        tickers.iter().map(|t| (t.symbol.as_str(), t)).collect();
    let mark_map: HashMap<&str, &BinanceMark> =
        marks.iter().map(|m| (m.symbol.as_str(), m)).collect();

    let mut rows_by_expiry: BTreeMap<NaiveDate, HashMap<u64, ChainRow>> = BTreeMap::new();

    for contract in contracts {
        let Some(right) = parse_side(&contract.side) else {
            tracing::debug!(symbol = %contract.symbol, side = %contract.side, "Skipping unknown side");
            continue;
        };
        let Some(strike) = parse_decimal_str(Some(contract.strike_price.as_str())) else {
            tracing::debug!(symbol = %contract.symbol, "Skipping contract without strike");
            continue;
        };
        let Some(expiry) = DateTime::from_timestamp_millis(contract.expiry_date) else {
            continue;
        };

        let ticker = ticker_map.get(contract.symbol.as_str());
        let mark = mark_map.get(contract.symbol.as_str());
        let quote = SideQuote {
            bid: ticker.and_then(|t| parse_decimal_str(t.bid_price.as_deref())),
            ask: ticker.and_then(|t| parse_decimal_str(t.ask_price.as_deref())),
            volume: ticker.and_then(|t| parse_decimal_str(t.volume.as_deref())),
            bid_iv: mark.and_then(|m| parse_decimal_str(m.bid_iv.as_deref())),
            ask_iv: mark.and_then(|m| parse_decimal_str(m.ask_iv.as_deref())),
            delta: mark.and_then(|m| parse_decimal_str(m.delta.as_deref())),
        };

        let row = rows_by_expiry
            .entry(expiry.date_naive())
            .or_default()
            .entry(strike.to_bits())
            .or_insert_with(|| ChainRow::new(strike));
        *row.quote_mut(right) = quote;
    }

    rows_by_expiry
        .into_iter()
        .map(|(expiry, rows)| {
            let mut chain = OptionChain::new(expiry, rows.into_values().collect());
            chain.sort_by_strike();
            (expiry, chain)
        })
        .collect()
}

fn parse_side(side: &str) -> Option<OptionRight> {
    side.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const FEB_13: i64 = 1_770_969_600_000;
    const FEB_27: i64 = 1_772_179_200_000;

    fn feb(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
    }

    fn contract(symbol: &str, underlying: &str, strike: &str, expiry: i64, side: &str) -> serde_json::Value {
        json!({
            "symbol": symbol,
            "underlying": underlying,
            "strikePrice": strike,
            "expiryDate": expiry,
            "side": side,
        })
    }

    async fn mount(server: &MockServer) {
        let info = json!({
            "optionSymbols": [
                contract("ETH-260213-3000-C", "ETHUSDT", "3000.000", FEB_13, "CALL"),
                contract("ETH-260213-3000-P", "ETHUSDT", "3000.000", FEB_13, "PUT"),
                contract("ETH-260213-2800-P", "ETHUSDT", "2800.000", FEB_13, "PUT"),
                contract("ETH-260227-3200-C", "ETHUSDT", "3200", FEB_27, "CALL"),
                contract("BTC-260213-90000-C", "BTCUSDT", "90000", FEB_13, "CALL"),
            ]
        });
        let tickers = json!([
            {"symbol": "ETH-260213-3000-C", "bidPrice": "120.5", "askPrice": "125", "volume": "42"},
            {"symbol": "ETH-260213-3000-P", "bidPrice": "", "askPrice": "118", "volume": "0"},
            {"symbol": "ETH-260227-3200-C", "bidPrice": "80", "askPrice": "84", "volume": "3"},
        ]);
        let marks = json!([
            {"symbol": "ETH-260213-3000-C", "bidIV": "0.61", "askIV": "0.66", "delta": "0.52"},
            {"symbol": "ETH-260213-3000-P", "bidIV": "0", "askIV": "0.67", "delta": "-0.48"},
            {"symbol": "ETH-260213-2800-P", "bidIV": "0.7", "askIV": "0.74", "delta": "-0.21"},
        ]);

        Mock::given(method("GET"))
            .and(path("/eapi/v1/exchangeInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(info))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/eapi/v1/ticker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tickers))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/eapi/v1/mark"))
            .respond_with(ResponseTemplate::new(200).set_body_json(marks))
            .mount(server)
            .await;
    }

    fn adapter(server: &MockServer) -> BinanceOptionsAdapter {
        BinanceOptionsAdapter::with_base_url(&server.uri(), "USDT", Duration::from_secs(2))
            .unwrap()
    }

    #[test]
    fn underlying_pair_appends_quote_asset_once() {
        let adapter =
            BinanceOptionsAdapter::with_base_url("http://localhost:1", "usdt", Duration::from_secs(1))
                .unwrap();
        assert_eq!(adapter.underlying_pair("eth"), "ETHUSDT");
        assert_eq!(adapter.underlying_pair("ETHUSDT"), "ETHUSDT");
    }

    #[tokio::test]
    async fn groups_by_expiry_and_strike() {
        let server = MockServer::start().await;
        mount(&server).await;

        let chains = adapter(&server).get_option_chain("ETH", None).await.unwrap();
        assert_eq!(chains.keys().copied().collect::<Vec<_>>(), vec![feb(13), feb(27)]);

        let near = &chains[&feb(13)];
        let strikes: Vec<f64> = near.rows.iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![2800.0, 3000.0]);

        let atm = near.find_strike(3000.0).unwrap();
        assert_eq!(atm.call.bid, Some(120.5));
        assert_eq!(atm.call.ask_iv, Some(0.66));
        assert_eq!(atm.call.delta, Some(0.52));
        assert_eq!(atm.call.volume, Some(42.0));
        // empty bid string is missing, zero IV is passed through for the caller's policy
        assert_eq!(atm.put.bid, None);
        assert_eq!(atm.put.bid_iv, Some(0.0));
        assert_eq!(atm.put.delta, Some(-0.48));
    }

    #[tokio::test]
    async fn contracts_without_ticker_keep_mark_fields() {
        let server = MockServer::start().await;
        mount(&server).await;

        let chains = adapter(&server).get_option_chain("ETH", None).await.unwrap();
        let row = chains[&feb(13)].find_strike(2800.0).unwrap();
        assert_eq!(row.put.bid, None);
        assert_eq!(row.put.ask, None);
        assert_eq!(row.put.delta, Some(-0.21));
        assert!(!row.put.is_quoted());
        assert_eq!(row.call, SideQuote::default());
    }

    #[tokio::test]
    async fn filters_requested_expiry() {
        let server = MockServer::start().await;
        mount(&server).await;

        let chains = adapter(&server)
            .get_option_chain("ETH", Some(feb(27)))
            .await
            .unwrap();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[&feb(27)].rows[0].call.delta, None);
    }

    #[tokio::test]
    async fn unknown_expiry_lists_available() {
        let server = MockServer::start().await;
        mount(&server).await;

        let Err(err) = adapter(&server)
            .get_option_chain("ETH", Some(feb(20)))
            .await
        else {
            panic!("expected DataUnavailable");
        };
        assert!(matches!(err, MarketDataError::DataUnavailable { .. }));
        assert!(err.to_string().contains("2026-02-13, 2026-02-27"));
    }

    #[tokio::test]
    async fn unknown_underlying_is_symbol_not_found() {
        let server = MockServer::start().await;
        mount(&server).await;

        let Err(err) = adapter(&server).get_option_chain("SOL", None).await else {
            panic!("expected SymbolNotFound");
        };
        assert_eq!(
            err,
            MarketDataError::SymbolNotFound {
                symbol: "SOLUSDT".to_string()
            }
        );
    }

    #[tokio::test]
    async fn failing_endpoint_fails_the_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = adapter(&server).get_option_chain("ETH", None).await;
        assert!(matches!(result, Err(MarketDataError::ApiError { .. })));
    }
}
