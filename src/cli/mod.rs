//! CLI interface for atr-sizer
//!
//! Provides subcommands for:
//! - `calc`: ATR, stop-loss and optional position size
//! - `prices`: Spot/futures prices and basis
//! - `config`: Show effective configuration

mod calc;
mod output;
mod prices;

pub use calc::CalcArgs;
pub use output::{format_calculation, format_prices};
pub use prices::PricesArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "atr-sizer")]
#[command(about = "ATR-based stop-loss and position sizing for Binance spot/futures")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute ATR, stop-loss and position size
    Calc(CalcArgs),
    /// Show spot and futures prices
    Prices(PricesArgs),
    /// Show configuration
    Config,
}
