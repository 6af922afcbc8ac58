//! Binance REST market data client
//!
//! Klines come from the spot API so the ATR is not distorted by futures
//! funding. Latest prices are read from both spot and USD-M futures tickers.

use super::{validate_series, Candle, FeedError, MarketData};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::telemetry::{record_latency, LatencyMetric};

/// Binance spot REST base URL
pub const BINANCE_SPOT_URL: &str = "https://api.binance.com";

/// Binance USD-M futures REST base URL
pub const BINANCE_FUTURES_URL: &str = "https://fapi.binance.com";

/// Binance caps a single klines request at 1000 bars
const MAX_KLINES_LIMIT: u32 = 1000;

/// Ticker price response for both spot and futures
#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

/// Configuration for the REST client
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// Spot API base URL
    pub spot_base_url: String,
    /// Futures API base URL
    pub futures_base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            spot_base_url: BINANCE_SPOT_URL.to_string(),
            futures_base_url: BINANCE_FUTURES_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// REST client for Binance public market data
pub struct BinanceRestClient {
    config: BinanceConfig,
    client: Client,
}

impl BinanceRestClient {
    /// Create a client with default endpoints
    pub fn new() -> Result<Self, FeedError> {
        Self::with_config(BinanceConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: BinanceConfig) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Build the klines endpoint URL
    fn klines_url(&self) -> String {
        format!("{}/api/v3/klines", self.config.spot_base_url)
    }

    /// Build the spot ticker endpoint URL
    fn spot_ticker_url(&self) -> String {
        format!("{}/api/v3/ticker/price", self.config.spot_base_url)
    }

    /// Build the futures ticker endpoint URL
    fn futures_ticker_url(&self) -> String {
        format!("{}/fapi/v1/ticker/price", self.config.futures_base_url)
    }

    /// GET a URL and return the body, mapping non-2xx to `FeedError::Status`
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, FeedError> {
        let response = self.client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status { status, body });
        }

        Ok(response.text().await?)
    }

    async fn fetch_ticker(&self, url: &str, symbol: &str) -> Result<Decimal, FeedError> {
        let body = self
            .get_text(url, &[("symbol", symbol.to_uppercase())])
            .await?;
        parse_ticker(&body)
    }
}

/// Parse a single decimal field that Binance encodes as a JSON string
fn parse_decimal_field(value: &Value, name: &str) -> Result<Decimal, FeedError> {
    let text = value
        .as_str()
        .ok_or_else(|| FeedError::Malformed(format!("{} is not a string", name)))?;
    Decimal::from_str(text).map_err(|e| FeedError::Malformed(format!("{}: {}", name, e)))
}

/// Parse a klines payload (array of arrays) into candles
pub(crate) fn parse_klines(body: &str) -> Result<Vec<Candle>, FeedError> {
    let rows: Vec<Vec<Value>> =
        serde_json::from_str(body).map_err(|e| FeedError::Malformed(e.to_string()))?;

    let mut candles = Vec::with_capacity(rows.len());
    for row in rows {
        if row.len() < 6 {
            return Err(FeedError::Malformed(format!(
                "kline row has {} fields, expected at least 6",
                row.len()
            )));
        }

        let open_ms = row[0]
            .as_i64()
            .ok_or_else(|| FeedError::Malformed("open time is not an integer".to_string()))?;
        let open_time = Utc
            .timestamp_millis_opt(open_ms)
            .single()
            .ok_or_else(|| FeedError::Malformed(format!("invalid open time {}", open_ms)))?;

        candles.push(Candle::new(
            open_time,
            parse_decimal_field(&row[1], "open")?,
            parse_decimal_field(&row[2], "high")?,
            parse_decimal_field(&row[3], "low")?,
            parse_decimal_field(&row[4], "close")?,
            parse_decimal_field(&row[5], "volume")?,
        ));
    }

    validate_series(&candles)?;
    Ok(candles)
}

/// Parse a `{"symbol": ..., "price": ...}` ticker payload
pub(crate) fn parse_ticker(body: &str) -> Result<Decimal, FeedError> {
    let ticker: TickerPrice =
        serde_json::from_str(body).map_err(|e| FeedError::Malformed(e.to_string()))?;
    Decimal::from_str(&ticker.price)
        .map_err(|e| FeedError::Malformed(format!("price: {}", e)))
}

#[async_trait]
impl MarketData for BinanceRestClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, FeedError> {
        let limit = limit.clamp(1, MAX_KLINES_LIMIT);
        let url = self.klines_url();

        tracing::debug!(url = %url, symbol, interval, limit, "Fetching klines");

        let started = Instant::now();
        let body = self
            .get_text(
                &url,
                &[
                    ("symbol", symbol.to_uppercase()),
                    ("interval", interval.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        record_latency(LatencyMetric::CandleFetch, started.elapsed());

        let candles = parse_klines(&body)?;
        tracing::debug!(bars = candles.len(), "Received klines");
        Ok(candles)
    }

    async fn fetch_spot_price(&self, symbol: &str) -> Result<Decimal, FeedError> {
        let started = Instant::now();
        let price = self.fetch_ticker(&self.spot_ticker_url(), symbol).await?;
        record_latency(LatencyMetric::SpotPrice, started.elapsed());
        Ok(price)
    }

    async fn fetch_futures_price(&self, symbol: &str) -> Result<Decimal, FeedError> {
        let started = Instant::now();
        let price = self.fetch_ticker(&self.futures_ticker_url(), symbol).await?;
        record_latency(LatencyMetric::FuturesPrice, started.elapsed());
        Ok(price)
    }
}
