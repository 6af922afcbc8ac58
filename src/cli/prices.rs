//! Prices command implementation

use clap::Args;

use super::output::format_prices;
use crate::config::Config;
use crate::engine::fetch_prices;
use crate::feed::BinanceRestClient;

#[derive(Args, Debug)]
pub struct PricesArgs {
    /// Trading pair (defaults to calculator.default_symbol)
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl PricesArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let symbol = self
            .symbol
            .clone()
            .unwrap_or_else(|| config.calculator.default_symbol.clone())
            .to_uppercase();

        if !config.calculator.supports_symbol(&symbol) {
            anyhow::bail!("Unsupported symbol {}", symbol);
        }

        let client = BinanceRestClient::with_config(config.feed.to_binance_config())?;
        let snapshot = fetch_prices(&client, &symbol).await?;

        if self.json {
            let body = serde_json::json!({
                "symbol": snapshot.symbol,
                "spot": snapshot.spot,
                "futures": snapshot.futures,
                "basis": snapshot.basis(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        } else {
            println!("{}", format_prices(&snapshot));
        }

        Ok(())
    }
}
