//! # Node Messages
//!
//! The requests a [`NetworkClient`](super::NetworkClient) sends to a node. Each
//! carries a oneshot sender the node answers on.

use super::NetworkError;
use crate::model::{
    CoinBalance, ExecuteOptions, ObjectDataOptions, ObjectId, ObjectPage, RequestType,
    SuiAddress, TransactionBatch, TransactionResponse,
};
use tokio::sync::oneshot;

/// One-shot response channel used by nodes.
pub type Response<T> = oneshot::Sender<Result<T, NetworkError>>;

#[derive(Debug)]
pub enum NetworkRequest {
    /// One page of the objects owned by `owner`, starting after `cursor`.
    OwnedObjects {
        owner: SuiAddress,
        cursor: Option<ObjectId>,
        options: ObjectDataOptions,
        respond_to: Response<ObjectPage>,
    },
    Balance {
        owner: SuiAddress,
        coin_type: String,
        respond_to: Response<CoinBalance>,
    },
    /// Sign `batch` as `sender` and execute it.
    Execute {
        sender: SuiAddress,
        batch: TransactionBatch,
        options: ExecuteOptions,
        request_type: RequestType,
        respond_to: Response<TransactionResponse>,
    },
}
