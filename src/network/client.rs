//! # Network Client
//!
//! Cloneable, channel-backed handle to a node. Every call is one request and
//! one awaited answer; nothing is retried.

use super::{NetworkError, NetworkRequest};
use crate::model::{
    CoinBalance, ExecuteOptions, ObjectDataOptions, ObjectId, ObjectPage, RequestType,
    SuiAddress, TransactionBatch, TransactionResponse,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct NetworkClient {
    sender: mpsc::Sender<NetworkRequest>,
}

impl NetworkClient {
    pub fn new(sender: mpsc::Sender<NetworkRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self, options))]
    pub async fn get_owned_objects(
        &self,
        owner: SuiAddress,
        cursor: Option<ObjectId>,
        options: ObjectDataOptions,
    ) -> Result<ObjectPage, NetworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(NetworkRequest::OwnedObjects {
                owner,
                cursor,
                options,
                respond_to,
            })
            .await
            .map_err(|_| NetworkError::NodeClosed)?;
        response.await.map_err(|_| NetworkError::NodeDropped)?
    }

    #[instrument(skip(self))]
    pub async fn get_balance(
        &self,
        owner: SuiAddress,
        coin_type: String,
    ) -> Result<CoinBalance, NetworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(NetworkRequest::Balance {
                owner,
                coin_type,
                respond_to,
            })
            .await
            .map_err(|_| NetworkError::NodeClosed)?;
        response.await.map_err(|_| NetworkError::NodeDropped)?
    }

    #[instrument(skip(self, batch, options))]
    pub async fn sign_and_execute(
        &self,
        sender: SuiAddress,
        batch: TransactionBatch,
        options: ExecuteOptions,
        request_type: RequestType,
    ) -> Result<TransactionResponse, NetworkError> {
        debug!(?batch, "Submitting batch");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(NetworkRequest::Execute {
                sender,
                batch,
                options,
                request_type,
                respond_to,
            })
            .await
            .map_err(|_| NetworkError::NodeClosed)?;
        response.await.map_err(|_| NetworkError::NodeDropped)?
    }
}
