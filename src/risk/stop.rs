//! ATR stop-loss placement

use super::{Direction, RiskError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stop price and its distance from entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopLoss {
    /// Stop-loss price
    pub stop_loss_price: Decimal,
    /// Absolute distance between entry and stop, always `multiplier * atr`
    pub stop_distance: Decimal,
}

/// Place a stop `atr_multiplier * atr` away from entry, against the trade
///
/// A long stop can land at or below zero for very large multipliers. It is
/// returned as-is; sizing then declines because the stop price is not positive.
pub fn derive_stop(
    entry_price: Decimal,
    direction: Direction,
    atr: Decimal,
    atr_multiplier: Decimal,
) -> Result<StopLoss, RiskError> {
    if entry_price <= Decimal::ZERO {
        return Err(RiskError::NonPositiveEntry(entry_price));
    }
    if atr_multiplier <= Decimal::ZERO {
        return Err(RiskError::NonPositiveMultiplier(atr_multiplier));
    }
    if atr < Decimal::ZERO {
        return Err(RiskError::NegativeAtr(atr));
    }

    let offset = atr_multiplier
        .checked_mul(atr)
        .ok_or(RiskError::Overflow("stop offset"))?;

    let stop_loss_price = entry_price
        .checked_add(direction.stop_sign() * offset)
        .ok_or(RiskError::Overflow("stop price"))?;

    Ok(StopLoss {
        stop_loss_price,
        stop_distance: offset,
    })
}

/// Reward/risk label; the multiplier stands in for the reward side
pub fn rr_text(atr_multiplier: Decimal) -> String {
    format!("1 : {}", atr_multiplier.normalize())
}
