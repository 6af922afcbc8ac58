//! Risk-based position sizing
//!
//! Sizes a position so that hitting the stop loses exactly `risk_percent` of
//! equity, then caps the notional at `equity * leverage`. Leverage only ever
//! limits size; it never grows a position past what the risk budget allows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RiskConfig;

/// Inputs to the sizing engine; any missing field disables sizing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskInputs {
    /// Account equity in quote currency
    pub equity: Option<Decimal>,
    /// Percent of equity to risk, e.g. 1 = 1%
    pub risk_percent: Option<Decimal>,
    /// Maximum leverage
    pub leverage: Option<Decimal>,
    /// Entry price
    pub entry_price: Option<Decimal>,
    /// Stop-loss price
    pub stop_loss_price: Option<Decimal>,
}

impl RiskInputs {
    /// Create inputs for an entry/stop pair with no account parameters
    pub fn new(entry_price: Decimal, stop_loss_price: Decimal) -> Self {
        Self {
            entry_price: Some(entry_price),
            stop_loss_price: Some(stop_loss_price),
            ..Self::default()
        }
    }

    /// Fill account parameters from configured defaults
    pub fn from_config(config: &RiskConfig) -> Self {
        Self {
            equity: config.equity,
            risk_percent: config.risk_percent,
            leverage: config.leverage,
            ..Self::default()
        }
    }

    /// Set account equity
    pub fn with_equity(mut self, equity: Decimal) -> Self {
        self.equity = Some(equity);
        self
    }

    /// Set risk percent
    pub fn with_risk_percent(mut self, risk_percent: Decimal) -> Self {
        self.risk_percent = Some(risk_percent);
        self
    }

    /// Set leverage
    pub fn with_leverage(mut self, leverage: Decimal) -> Self {
        self.leverage = Some(leverage);
        self
    }

    /// Set entry and stop prices
    pub fn with_prices(mut self, entry_price: Decimal, stop_loss_price: Decimal) -> Self {
        self.entry_price = Some(entry_price);
        self.stop_loss_price = Some(stop_loss_price);
        self
    }

    /// Whether equity, risk percent and leverage are all present
    pub fn has_account(&self) -> bool {
        self.equity.is_some() && self.risk_percent.is_some() && self.leverage.is_some()
    }
}

/// Output of the sizing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingResult {
    /// Currency lost if the stop is hit
    pub risk_amount: Decimal,
    /// `|entry - stop|`
    pub stop_distance: Decimal,
    /// Notional that loses exactly `risk_amount` at the stop
    pub notional_by_risk: Decimal,
    /// `equity * leverage`
    pub max_notional_by_lev: Decimal,
    /// `min(notional_by_risk, max_notional_by_lev)`
    pub final_notional: Decimal,
    /// Position quantity in base units
    pub qty: Decimal,
}

impl SizingResult {
    /// True when leverage, not risk, bounded the position
    pub fn is_leverage_capped(&self) -> bool {
        self.max_notional_by_lev < self.notional_by_risk
    }
}

fn positive(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

/// Size a position, or `None` if any input is missing, non-positive, or
/// entry equals stop
pub fn size_position(inputs: &RiskInputs) -> Option<SizingResult> {
    let equity = positive(inputs.equity)?;
    let risk_percent = positive(inputs.risk_percent)?;
    let leverage = positive(inputs.leverage)?;
    let entry_price = positive(inputs.entry_price)?;
    let stop_loss_price = positive(inputs.stop_loss_price)?;

    let stop_distance = (entry_price - stop_loss_price).abs();
    if stop_distance.is_zero() {
        return None;
    }

    let risk_amount = equity.checked_mul(risk_percent)?.checked_div(Decimal::ONE_HUNDRED)?;
    let notional_by_risk = risk_amount.checked_mul(entry_price)?.checked_div(stop_distance)?;
    let max_notional_by_lev = equity.checked_mul(leverage)?;
    let final_notional = notional_by_risk.min(max_notional_by_lev);
    let qty = final_notional.checked_div(entry_price)?;

    Some(SizingResult {
        risk_amount,
        stop_distance,
        notional_by_risk,
        max_notional_by_lev,
        final_notional,
        qty,
    })
}
