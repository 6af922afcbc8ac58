//! Market data types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One OHLCV bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Base asset volume
    pub volume: Decimal,
}

impl Candle {
    /// Create a new candle
    pub fn new(
        open_time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// High minus low
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }
}

/// Errors raised by market data providers
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport-level failure (connect, timeout, decode)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Provider answered with a non-success status
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Payload parsed but did not make sense
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Check that a series is strictly increasing in open time with positive prices
pub fn validate_series(candles: &[Candle]) -> Result<(), FeedError> {
    for (i, candle) in candles.iter().enumerate() {
        let prices = [candle.open, candle.high, candle.low, candle.close];
        if prices.iter().any(|p| *p <= Decimal::ZERO) {
            return Err(FeedError::Malformed(format!(
                "non-positive price in bar {}",
                i
            )));
        }
        if candle.low > candle.high {
            return Err(FeedError::Malformed(format!("low above high in bar {}", i)));
        }
        if i > 0 && candle.open_time <= candles[i - 1].open_time {
            return Err(FeedError::Malformed(format!(
                "open time not strictly increasing at bar {}",
                i
            )));
        }
    }
    Ok(())
}
