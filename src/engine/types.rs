//! Calculation request, result and error types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::Smoothing;
use crate::risk::{Direction, RiskInputs, SizingResult};

/// Lifecycle of a single calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalcState {
    Idle,
    Validating,
    FetchingData,
    Computing,
    Success,
    Failed,
}

impl fmt::Display for CalcState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalcState::Idle => "idle",
            CalcState::Validating => "validating",
            CalcState::FetchingData => "fetching_data",
            CalcState::Computing => "computing",
            CalcState::Success => "success",
            CalcState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Request field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    EntryPrice,
    AtrPeriod,
    AtrMultiplier,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputField::EntryPrice => "entry price",
            InputField::AtrPeriod => "ATR period",
            InputField::AtrMultiplier => "ATR multiplier",
        };
        f.write_str(name)
    }
}

/// Structural error kind, one per `CalcError` variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    InsufficientData,
    DataFetchFailed,
    Superseded,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InsufficientData => "insufficient_data",
            ErrorKind::DataFetchFailed => "data_fetch_failed",
            ErrorKind::Superseded => "superseded",
        }
    }
}

/// Calculation errors
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
pub enum CalcError {
    /// A request field is missing or out of range
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: InputField, reason: String },
    /// Too few bars for the requested ATR period
    #[error("Not enough candles to compute ATR: got {bars}, need {required}")]
    InsufficientData { bars: usize, required: usize },
    /// The market data provider failed or returned garbage
    #[error("Failed to fetch candles: {0}")]
    DataFetchFailed(String),
    /// A newer calculation was issued before this one finished
    #[error("Calculation {id} superseded by newer request {latest}")]
    Superseded { id: u64, latest: u64 },
}

impl CalcError {
    pub(crate) fn invalid(field: InputField, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Structural kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::InvalidInput { .. } => ErrorKind::InvalidInput,
            CalcError::InsufficientData { .. } => ErrorKind::InsufficientData,
            CalcError::DataFetchFailed(_) => ErrorKind::DataFetchFailed,
            CalcError::Superseded { .. } => ErrorKind::Superseded,
        }
    }
}

/// One user action's worth of inputs, built once and never mutated
///
/// Missing values are `None` and rejected during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub symbol: String,
    pub interval: String,
    pub direction: Direction,
    pub entry_price: Option<Decimal>,
    pub atr_period: Option<u32>,
    pub atr_multiplier: Option<Decimal>,
    /// Account parameters; entry/stop are filled in by the calculator
    pub risk: RiskInputs,
}

impl CalculationRequest {
    /// Create a request with no numeric inputs set
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, direction: Direction) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            interval: interval.into(),
            direction,
            entry_price: None,
            atr_period: None,
            atr_multiplier: None,
            risk: RiskInputs::default(),
        }
    }

    pub fn with_entry_price(mut self, entry_price: Decimal) -> Self {
        self.entry_price = Some(entry_price);
        self
    }

    pub fn with_atr_period(mut self, atr_period: u32) -> Self {
        self.atr_period = Some(atr_period);
        self
    }

    pub fn with_atr_multiplier(mut self, atr_multiplier: Decimal) -> Self {
        self.atr_multiplier = Some(atr_multiplier);
        self
    }

    pub fn with_risk(mut self, risk: RiskInputs) -> Self {
        self.risk = risk;
        self
    }

    /// Check entry price, then period, then multiplier; first failure wins
    pub fn validate(&self) -> Result<ValidatedRequest, CalcError> {
        let entry_price = match self.entry_price {
            None => return Err(CalcError::invalid(InputField::EntryPrice, "missing")),
            Some(p) if p <= Decimal::ZERO => {
                return Err(CalcError::invalid(
                    InputField::EntryPrice,
                    format!("must be greater than 0, got {}", p),
                ))
            }
            Some(p) => p,
        };

        let atr_period = match self.atr_period {
            None => return Err(CalcError::invalid(InputField::AtrPeriod, "missing")),
            Some(0) => {
                return Err(CalcError::invalid(
                    InputField::AtrPeriod,
                    "must be an integer greater than 0",
                ))
            }
            Some(n) => n as usize,
        };

        let atr_multiplier = match self.atr_multiplier {
            None => return Err(CalcError::invalid(InputField::AtrMultiplier, "missing")),
            Some(m) if m <= Decimal::ZERO => {
                return Err(CalcError::invalid(
                    InputField::AtrMultiplier,
                    format!("must be greater than 0, got {}", m),
                ))
            }
            Some(m) => m,
        };

        Ok(ValidatedRequest {
            symbol: self.symbol.clone(),
            interval: self.interval.clone(),
            direction: self.direction,
            entry_price,
            atr_period,
            atr_multiplier,
            risk: self.risk,
        })
    }
}

/// A request whose numeric inputs passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub symbol: String,
    pub interval: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub atr_period: usize,
    pub atr_multiplier: Decimal,
    pub risk: RiskInputs,
}

/// Successful calculation output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    pub symbol: String,
    pub interval: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub atr_period: usize,
    pub smoothing: Smoothing,
    /// Bars the ATR was computed from
    pub bars: usize,
    pub atr: Decimal,
    pub stop_loss_price: Decimal,
    pub stop_distance: Decimal,
    /// Reward/risk label, `1 : multiplier`
    pub rr_text: String,
    /// Absent when account inputs are incomplete or invalid
    pub sizing: Option<SizingResult>,
}

/// Exactly one of a calculation or an error
pub type CalculationResult = Result<Calculation, CalcError>;
