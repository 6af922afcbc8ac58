//! Volatility model module
//!
//! Average True Range over historical candles

mod atr;

pub use atr::{compute_atr, compute_atr_with, true_ranges, Smoothing};
