//! Runtime wiring for the scripts.
//!
//! - [`LocalNetwork`]: starts the local node from a [`ScriptConfig`](crate::config::ScriptConfig) and shuts it down
//! - [`setup_tracing`]: initializes logging

pub mod local_network;
pub mod tracing;

pub use local_network::*;
pub use self::tracing::*;
