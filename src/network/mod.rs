//! # Network
//!
//! Everything the scripts know about the chain goes through a
//! [`NetworkClient`]: a cloneable handle that sends [`NetworkRequest`]s over a
//! tokio channel and awaits the answer on a oneshot channel.
//!
//! Two nodes serve that channel:
//!
//! - [`LocalNode`]: an actor owning a [`Ledger`] that really executes batches.
//! - [`mock::MockNetwork`]: answers from a queue of expectations, for tests.

pub mod client;
pub mod error;
pub mod ledger;
pub mod message;
pub mod mock;
pub mod node;

pub use client::*;
pub use error::*;
pub use ledger::*;
pub use message::*;
pub use node::*;
