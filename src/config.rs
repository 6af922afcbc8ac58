//! Configuration types for atr-sizer

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::feed::{BinanceConfig, BINANCE_FUTURES_URL, BINANCE_SPOT_URL};
use crate::model::Smoothing;
use crate::telemetry::LogFormat;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub calculator: CalculatorConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Market data endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Spot REST base URL
    #[serde(default = "default_spot_url")]
    pub spot_base_url: String,
    /// USD-M futures REST base URL
    #[serde(default = "default_futures_url")]
    pub futures_base_url: String,
    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_spot_url() -> String {
    BINANCE_SPOT_URL.to_string()
}
fn default_futures_url() -> String {
    BINANCE_FUTURES_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            spot_base_url: default_spot_url(),
            futures_base_url: default_futures_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FeedConfig {
    /// Build the REST client configuration
    pub fn to_binance_config(&self) -> BinanceConfig {
        BinanceConfig {
            spot_base_url: self.spot_base_url.clone(),
            futures_base_url: self.futures_base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Calculation defaults and the supported instrument lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Tradable symbols
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Kline intervals offered for the ATR
    #[serde(default = "default_intervals")]
    pub intervals: Vec<String>,

    #[serde(default = "default_symbol")]
    pub default_symbol: String,

    #[serde(default = "default_interval")]
    pub default_interval: String,

    /// ATR lookback in bars
    #[serde(default = "default_atr_period")]
    pub atr_period: u32,

    /// Stop distance in ATRs
    #[serde(default = "default_atr_multiplier")]
    pub atr_multiplier: Decimal,

    /// Bars requested per calculation
    #[serde(default = "default_candle_limit")]
    pub candle_limit: u32,

    #[serde(default)]
    pub smoothing: Smoothing,
}

fn default_symbols() -> Vec<String> {
    ["BTCUSDT", "ETHUSDT", "SOLUSDT", "BNBUSDT", "XRPUSDT", "DOGEUSDT"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_intervals() -> Vec<String> {
    ["5m", "15m", "30m", "1h", "4h", "1d"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_symbol() -> String {
    "BTCUSDT".to_string()
}
fn default_interval() -> String {
    "1h".to_string()
}
fn default_atr_period() -> u32 {
    14
}
fn default_atr_multiplier() -> Decimal {
    Decimal::new(15, 1) // 1.5
}
fn default_candle_limit() -> u32 {
    200
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            intervals: default_intervals(),
            default_symbol: default_symbol(),
            default_interval: default_interval(),
            atr_period: default_atr_period(),
            atr_multiplier: default_atr_multiplier(),
            candle_limit: default_candle_limit(),
            smoothing: Smoothing::default(),
        }
    }
}

impl CalculatorConfig {
    /// Whether a symbol is in the configured list (case-insensitive)
    pub fn supports_symbol(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol))
    }

    /// Whether an interval is in the configured list
    pub fn supports_interval(&self, interval: &str) -> bool {
        self.intervals.iter().any(|i| i == interval)
    }
}

/// Optional account defaults for sizing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Account equity in quote currency
    pub equity: Option<Decimal>,
    /// Percent of equity risked per trade
    pub risk_percent: Option<Decimal>,
    /// Maximum leverage
    pub leverage: Option<Decimal>,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Expose Prometheus metrics on this port when set
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> anyhow::Result<()> {
        let calc = &self.calculator;
        if calc.symbols.is_empty() || calc.intervals.is_empty() {
            anyhow::bail!("calculator.symbols and calculator.intervals must not be empty");
        }
        if !calc.supports_symbol(&calc.default_symbol) {
            anyhow::bail!(
                "default_symbol {} is not in calculator.symbols",
                calc.default_symbol
            );
        }
        if !calc.supports_interval(&calc.default_interval) {
            anyhow::bail!(
                "default_interval {} is not in calculator.intervals",
                calc.default_interval
            );
        }
        if calc.candle_limit == 0 {
            anyhow::bail!("calculator.candle_limit must be at least 1");
        }
        Ok(())
    }
}
