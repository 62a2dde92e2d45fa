//! New Account Binary
//!
//! Creates a bank account and transfers it to the sender.
//!
//! # Usage
//! ```bash
//! cargo run --bin new_account -- [--config bank.json] [--count 1]
//! ```

use anyhow::{Context, Result};
use bank_scripts::composer::BankComposer;
use bank_scripts::config::ScriptConfig;
use bank_scripts::runtime::{setup_tracing, LocalNetwork};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Create a bank account for the configured sender")]
struct Args {
    /// Script configuration (JSON)
    #[arg(long, default_value = "bank.json")]
    config: PathBuf,

    /// Number of accounts to create
    #[arg(long, default_value_t = 1)]
    count: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();

    let config = ScriptConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let network = LocalNetwork::start(&config).context("Failed to start local network")?;
    let composer = BankComposer::new(network.client(), &config.deployment, config.sender.clone())
        .context("Invalid deployment")?;
    let account_type = composer.ids().account_type();

    for _ in 0..args.count {
        // Failures are already logged by the composer.
        if let Ok(response) = composer.new_account().await {
            for id in response.created_of_type(&account_type) {
                info!(account = %id, "Account created");
            }
        }
    }

    drop(composer);
    network.shutdown().await?;
    Ok(())
}
