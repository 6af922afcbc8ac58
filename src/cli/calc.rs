//! Calc command implementation

use clap::Args;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::output::format_calculation;
use crate::config::Config;
use crate::engine::{CalculationRequest, Calculator};
use crate::feed::{BinanceRestClient, MarketData};
use crate::risk::{Direction, RiskInputs};

#[derive(Args, Debug)]
pub struct CalcArgs {
    /// Entry price
    #[arg(short, long, conflicts_with = "use_futures")]
    pub entry: Option<Decimal>,

    /// Use the current futures price as the entry price
    #[arg(long)]
    pub use_futures: bool,

    /// Trade direction: long or short
    #[arg(short, long, default_value = "long")]
    pub direction: Direction,

    /// Trading pair (defaults to calculator.default_symbol)
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Kline interval (defaults to calculator.default_interval)
    #[arg(short, long)]
    pub interval: Option<String>,

    /// ATR period in bars
    #[arg(short, long)]
    pub period: Option<u32>,

    /// Stop distance in ATRs
    #[arg(short, long)]
    pub multiplier: Option<Decimal>,

    /// Account equity
    #[arg(long)]
    pub equity: Option<Decimal>,

    /// Percent of equity to risk
    #[arg(long)]
    pub risk_percent: Option<Decimal>,

    /// Maximum leverage
    #[arg(long)]
    pub leverage: Option<Decimal>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CalcArgs {
    /// Resolve symbol and interval against the configured lists
    fn resolve_instrument(&self, config: &Config) -> anyhow::Result<(String, String)> {
        let calc = &config.calculator;
        let symbol = self
            .symbol
            .clone()
            .unwrap_or_else(|| calc.default_symbol.clone())
            .to_uppercase();
        let interval = self
            .interval
            .clone()
            .unwrap_or_else(|| calc.default_interval.clone());

        if !calc.supports_symbol(&symbol) {
            anyhow::bail!(
                "Unsupported symbol {}; choose one of {}",
                symbol,
                calc.symbols.join(", ")
            );
        }
        if !calc.supports_interval(&interval) {
            anyhow::bail!(
                "Unsupported interval {}; choose one of {}",
                interval,
                calc.intervals.join(", ")
            );
        }

        Ok((symbol, interval))
    }

    /// Build the immutable request for one calculation
    ///
    /// `entry` overrides `--entry` when the futures price was fetched.
    pub fn build_request(
        &self,
        config: &Config,
        entry: Option<Decimal>,
    ) -> anyhow::Result<CalculationRequest> {
        let (symbol, interval) = self.resolve_instrument(config)?;

        let mut risk = RiskInputs::from_config(&config.risk);
        if let Some(equity) = self.equity {
            risk = risk.with_equity(equity);
        }
        if let Some(risk_percent) = self.risk_percent {
            risk = risk.with_risk_percent(risk_percent);
        }
        if let Some(leverage) = self.leverage {
            risk = risk.with_leverage(leverage);
        }

        let mut request = CalculationRequest::new(symbol, interval, self.direction)
            .with_atr_period(self.period.unwrap_or(config.calculator.atr_period))
            .with_atr_multiplier(
                self.multiplier
                    .unwrap_or(config.calculator.atr_multiplier),
            )
            .with_risk(risk);
        request.entry_price = entry.or(self.entry);

        Ok(request)
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = Arc::new(BinanceRestClient::with_config(
            config.feed.to_binance_config(),
        )?);

        let futures_entry = if self.use_futures {
            let (symbol, _) = self.resolve_instrument(config)?;
            let price = client.fetch_futures_price(&symbol).await.map_err(|e| {
                anyhow::anyhow!("No futures price available for {}, pass --entry instead: {}", symbol, e)
            })?;
            tracing::info!(%symbol, %price, "Using futures price as entry");
            Some(price)
        } else {
            None
        };

        let request = self.build_request(config, futures_entry)?;
        let calculator = Calculator::new(client, &config.calculator);

        match calculator.calculate(&request).await {
            Ok(calc) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&calc)?);
                } else {
                    println!("{}", format_calculation(&calc));
                }
                Ok(())
            }
            Err(e) => {
                if self.json {
                    let body = serde_json::json!({
                        "kind": e.kind(),
                        "message": e.to_string(),
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(e.into())
            }
        }
    }
}
