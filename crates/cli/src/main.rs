use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use sentinel_bitunix::{BitunixClient, BitunixClientConfig};
use sentinel_core::{ConfigLoader, Sentinel};

mod input;

use input::StdinSettingsProvider;

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "Protective-order automation for Bitunix futures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sentinel loop against a live account
    Run {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => run(&config).await,
    }
}

async fn run(config_path: &str) -> Result<()> {
    // Configuration failures are fatal here, before the loop starts; once
    // the loop is running no error terminates the process.
    let config = ConfigLoader::load_from(config_path)
        .with_context(|| format!("failed to load configuration from {config_path}"))?;
    ensure!(
        !config.bitunix.api_key.is_empty() && !config.bitunix.secret_key.is_empty(),
        "bitunix.api_key and bitunix.secret_key must be configured"
    );

    let client = BitunixClient::new(
        config.bitunix.api_key.clone(),
        SecretString::from(config.bitunix.secret_key.clone()),
        BitunixClientConfig::default().with_base_url(config.bitunix.base_url.clone()),
    )?;

    tracing::info!(base_url = %config.bitunix.base_url, "sentinel starting");

    let mut sentinel = Sentinel::new(client, StdinSettingsProvider, config.engine);
    sentinel.run().await
}
