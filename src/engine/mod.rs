//! Calculation engine module
//!
//! Orchestrates a single ATR stop / position size calculation and the
//! informational spot/futures price board

mod calculator;
mod prices;
mod types;

pub use calculator::{compute, Calculator};
pub use prices::{fetch_prices, PriceError, PriceSnapshot};
pub use types::{
    CalcError, CalcState, Calculation, CalculationRequest, CalculationResult, ErrorKind,
    InputField, ValidatedRequest,
};
