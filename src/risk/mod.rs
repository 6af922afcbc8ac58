//! Risk management module
//!
//! ATR stop placement and risk-budget position sizing

mod sizing;
mod stop;
mod types;

pub use sizing::{size_position, RiskInputs, SizingResult};
pub use stop::{derive_stop, rr_text, StopLoss};
pub use types::{Direction, RiskError};
