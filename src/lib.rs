//! # Bank Scripts
//!
//! Transaction scripts for a deployed on-chain bank: deposit native coin as
//! collateral and borrow the bank's stablecoin, or just open an account.
//!
//! ## Layers
//!
//! - **[model]**: identities, owned-object pages, balances and the staged
//!   [`TransactionBatch`](model::TransactionBatch).
//! - **[network]**: the channel protocol to a node, the cloneable
//!   [`NetworkClient`](network::NetworkClient), the in-process
//!   [`LocalNode`](network::LocalNode) and the [`MockNetwork`](network::mock::MockNetwork).
//! - **[composer]**: account discovery, batch composition, submission and
//!   reporting ([`BankComposer`](composer::BankComposer)).
//! - **[config]**: identifier resolution and script settings.
//! - **[runtime]**: tracing and the local network lifecycle.
//!
//! ## Conditional staging
//!
//! Whether the sender already has an account is only known at run time. The
//! composer resolves it once into an [`AccountRef`](composer::AccountRef):
//! either the existing object, or the output of a `new_account` call staged in
//! the same batch. Every later command takes the account through
//! [`AccountRef::argument`](composer::AccountRef::argument), and only a
//! created account gets transferred to the sender at the end.
//!
//! ## Atomicity
//!
//! A batch lands completely or not at all. That guarantee belongs to the node
//! (see [`network::ledger`]); the composer never tries to undo anything and
//! never retries.

pub mod composer;
pub mod config;
pub mod model;
pub mod network;
pub mod runtime;
