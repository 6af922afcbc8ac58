//! atr-sizer: ATR stop-loss and position sizing for Binance spot/futures
//!
//! This library provides the core components for:
//! - Historical klines and spot/futures prices from Binance REST
//! - Average True Range estimation (simple or Wilder smoothing)
//! - ATR-based stop-loss placement for long and short trades
//! - Risk-budget position sizing capped by leverage
//! - A calculation orchestrator where the latest request wins
//! - Logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod engine;
pub mod feed;
pub mod model;
pub mod risk;
pub mod telemetry;
