//! Deposit and Borrow Binary
//!
//! Deposits gas coin into the bank and borrows stablecoin against it in one
//! batch, creating the sender's bank account first if it has none. The
//! stablecoin balance is reported after every round, even a failed one.
//!
//! # Usage
//! ```bash
//! cargo run --bin deposit_and_borrow -- [--config bank.json] [--deposit 1000] [--borrow 500] [--rounds 1]
//! ```
//!
//! With `--rounds 2` the first round creates the account and the second one
//! reuses it.

use anyhow::{Context, Result};
use bank_scripts::composer::{BankComposer, DEFAULT_BORROW_AMOUNT, DEFAULT_DEPOSIT_AMOUNT};
use bank_scripts::config::ScriptConfig;
use bank_scripts::runtime::{setup_tracing, LocalNetwork};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Instrument};

#[derive(Parser, Debug)]
#[command(about = "Deposit gas coin into the bank and borrow stablecoin")]
struct Args {
    /// Script configuration (JSON)
    #[arg(long, default_value = "bank.json")]
    config: PathBuf,

    /// Amount of gas coin to deposit
    #[arg(long, default_value_t = DEFAULT_DEPOSIT_AMOUNT)]
    deposit: u64,

    /// Amount of stablecoin to borrow
    #[arg(long, default_value_t = DEFAULT_BORROW_AMOUNT)]
    borrow: u64,

    /// Number of deposit/borrow rounds
    #[arg(long, default_value_t = 1)]
    rounds: u32,
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

    for round in 1..=args.rounds {
        let span = tracing::info_span!("round", round);
        let report = composer
            .deposit_and_borrow(args.deposit, args.borrow)
            .instrument(span)
            .await
            .context("Failed to fetch stablecoin balance")?;

        if report.is_success() {
            info!(round, balance = report.balance.total_balance, "Round complete");
        } else {
            warn!(round, balance = report.balance.total_balance, "Round failed");
        }
    }

    drop(composer);
    network.shutdown().await?;
    Ok(())
}
