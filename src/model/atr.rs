//! Average True Range
//!
//! True Range for each bar after the first is
//! `max(high - low, |high - prev_close|, |low - prev_close|)`.
//! The ATR averages the last `period` of those values, either as a plain
//! mean or with Wilder's recursive smoothing over the whole series.

use crate::feed::Candle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How true ranges are averaged into the ATR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smoothing {
    /// Arithmetic mean of the latest `period` true ranges
    #[default]
    Simple,
    /// Wilder's RMA: seeded with the first `period` mean, then
    /// `atr = (atr * (period - 1) + tr) / period`
    Wilder,
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Smoothing::Simple => write!(f, "simple"),
            Smoothing::Wilder => write!(f, "wilder"),
        }
    }
}

/// True range of every bar after the first
pub fn true_ranges(series: &[Candle]) -> Vec<Decimal> {
    series
        .windows(2)
        .map(|pair| {
            let prev_close = pair[0].close;
            let bar = &pair[1];
            bar.range()
                .max((bar.high - prev_close).abs())
                .max((bar.low - prev_close).abs())
        })
        .collect()
}

/// ATR with the default (simple) smoothing
///
/// Returns `None` when `period` is zero, the series has fewer than
/// `period + 1` bars, or the true ranges overflow `Decimal`.
pub fn compute_atr(series: &[Candle], period: usize) -> Option<Decimal> {
    compute_atr_with(series, period, Smoothing::Simple)
}

/// ATR with an explicit smoothing method
pub fn compute_atr_with(series: &[Candle], period: usize, smoothing: Smoothing) -> Option<Decimal> {
    if period == 0 || series.len() <= period {
        return None;
    }

    let trs = true_ranges(series);
    let n = Decimal::from(period);

    match smoothing {
        Smoothing::Simple => checked_sum(&trs[trs.len() - period..])?.checked_div(n),
        Smoothing::Wilder => {
            let seed = checked_sum(&trs[..period])?.checked_div(n)?;
            trs[period..].iter().try_fold(seed, |atr, tr| {
                atr.checked_mul(n - Decimal::ONE)?
                    .checked_add(*tr)?
                    .checked_div(n)
            })
        }
    }
}

fn checked_sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
}
