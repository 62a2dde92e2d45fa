//! Error types for bank transactions.

use crate::network::NetworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BankError {
    /// The node could not be reached or refused the request.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// The batch was executed but aborted; nothing it staged landed.
    #[error("Transaction {digest} failed: {error}")]
    ExecutionFailed { digest: String, error: String },

    #[error("Owned objects page announced more results without a cursor")]
    BrokenPagination,
}
