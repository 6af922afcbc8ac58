//! Market data module
//!
//! Historical klines and latest prices from Binance spot and USD-M futures

mod binance;
mod types;

pub use binance::{BinanceConfig, BinanceRestClient, BINANCE_FUTURES_URL, BINANCE_SPOT_URL};
pub use types::{validate_series, Candle, FeedError};

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for market data providers
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch up to `limit` most recent bars, oldest first
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, FeedError>;
    /// Latest spot price
    async fn fetch_spot_price(&self, symbol: &str) -> Result<Decimal, FeedError>;
    /// Latest perpetual futures price
    async fn fetch_futures_price(&self, symbol: &str) -> Result<Decimal, FeedError>;
}
