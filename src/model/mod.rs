//! Plain data exchanged with the network: identities, objects, balances and batches.

pub mod object;
pub mod transaction;

pub use object::*;
pub use transaction::*;
