//! Risk management types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Risk management errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RiskError {
    /// Entry price must be positive
    #[error("Entry price must be positive, got {0}")]
    NonPositiveEntry(Decimal),
    /// ATR multiplier must be positive
    #[error("ATR multiplier must be positive, got {0}")]
    NonPositiveMultiplier(Decimal),
    /// ATR cannot be negative
    #[error("ATR cannot be negative, got {0}")]
    NegativeAtr(Decimal),
    /// Decimal arithmetic overflowed
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),
    /// Unrecognised direction string
    #[error("Unknown direction '{0}', expected 'long' or 'short'")]
    UnknownDirection(String),
}

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Buy, stop sits below entry
    Long,
    /// Sell, stop sits above entry
    Short,
}

impl Direction {
    /// Sign applied to the stop offset: -1 for long, +1 for short
    pub fn stop_sign(&self) -> Decimal {
        match self {
            Direction::Long => Decimal::NEGATIVE_ONE,
            Direction::Short => Decimal::ONE,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

impl FromStr for Direction {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" | "buy" => Ok(Direction::Long),
            "short" | "sell" => Ok(Direction::Short),
            other => Err(RiskError::UnknownDirection(other.to_string())),
        }
    }
}
