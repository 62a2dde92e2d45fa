//! # Network Errors
//!
//! Errors a node reports for a request, plus the channel failures of the
//! client itself. Aborts during Move execution are not errors: they come back
//! as a failed [`ExecutionStatus`](crate::model::ExecutionStatus).

use crate::model::{ObjectId, SuiAddress};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("Node closed")]
    NodeClosed,
    #[error("Node dropped response channel")]
    NodeDropped,
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),
    #[error("Object {object_id} cannot be used by {sender}")]
    InvalidOwnership {
        object_id: ObjectId,
        sender: SuiAddress,
    },
    #[error("Insufficient coin balance: required {required}, available {available}")]
    InsufficientCoinBalance { required: u64, available: u64 },
    #[error("Invalid cursor: {0}")]
    InvalidCursor(ObjectId),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}
