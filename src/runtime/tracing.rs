//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter.
//! Verbosity follows `RUST_LOG` and defaults to `info`, so a script run prints
//! the transaction result, its status and the final balance.
//!
//! ```bash
//! # Default: results and milestones
//! cargo run --bin deposit_and_borrow
//!
//! # Submitted batches and every node request
//! RUST_LOG=debug cargo run --bin deposit_and_borrow
//!
//! # Only the composer
//! RUST_LOG=bank_scripts::composer=debug cargo run --bin new_account
//! ```
//!
//! With `RUST_LOG=debug` the submitted batch is logged once, in full, when it
//! enters the client:
//!
//! ```text
//! DEBUG deposit_and_borrow:sign_and_execute: Submitting batch batch=TransactionBatch { inputs: [...], commands: [...] }
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
