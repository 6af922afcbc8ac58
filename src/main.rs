use atr_sizer::cli::{Cli, Commands};
use atr_sizer::config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if std::path::Path::new(&cli.config).exists() {
        Config::load(&cli.config)?
    } else {
        eprintln!("Warning: {} not found, using default configuration", cli.config);
        Config::default()
    };

    // Initialize telemetry
    let _telemetry = atr_sizer::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Calc(args) => {
            tracing::debug!("Running calculation");
            args.execute(&config).await?;
        }
        Commands::Prices(args) => {
            tracing::debug!("Refreshing prices");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration ({}):", cli.config);
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
