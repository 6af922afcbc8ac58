//! Spot and futures price snapshot for display
//!
//! Both tickers are requested concurrently. Any failure collapses into one
//! `PriceError` so the caller shows a single message; calculations never
//! depend on this path.

use crate::feed::MarketData;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Latest spot and futures prices for one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub symbol: String,
    pub spot: Decimal,
    pub futures: Decimal,
}

impl PriceSnapshot {
    /// Futures minus spot
    pub fn basis(&self) -> Decimal {
        self.futures - self.spot
    }
}

/// Aggregated price refresh failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to refresh spot/futures prices for {symbol}: {reasons}")]
pub struct PriceError {
    pub symbol: String,
    pub reasons: String,
}

/// Fetch spot and futures prices concurrently
pub async fn fetch_prices<M: MarketData + ?Sized>(
    market_data: &M,
    symbol: &str,
) -> Result<PriceSnapshot, PriceError> {
    let (spot, futures) = tokio::join!(
        market_data.fetch_spot_price(symbol),
        market_data.fetch_futures_price(symbol)
    );

    match (spot, futures) {
        (Ok(spot), Ok(futures)) => Ok(PriceSnapshot {
            symbol: symbol.to_uppercase(),
            spot,
            futures,
        }),
        (spot, futures) => {
            let reasons = [
                spot.err().map(|e| format!("spot: {}", e)),
                futures.err().map(|e| format!("futures: {}", e)),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("; ");

            tracing::warn!(symbol, %reasons, "Price refresh failed");
            Err(PriceError {
                symbol: symbol.to_uppercase(),
                reasons,
            })
        }
    }
}
