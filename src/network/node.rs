//! # Local Node
//!
//! An in-process stand-in for a full node. It owns a [`Ledger`] and the
//! receiving end of the request channel, and answers requests one at a time,
//! so a batch never observes another batch half-applied and the ledger needs
//! no lock.

use super::{Ledger, NetworkClient, NetworkRequest};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct LocalNode {
    receiver: mpsc::Receiver<NetworkRequest>,
    ledger: Ledger,
}

impl LocalNode {
    pub fn new(buffer_size: usize, ledger: Ledger) -> (Self, NetworkClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let node = Self { receiver, ledger };
        (node, NetworkClient::new(sender))
    }

    /// Runs the node's event loop until every client has been dropped.
    pub async fn run(mut self) {
        info!(objects = self.ledger.len(), "Node started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                NetworkRequest::OwnedObjects {
                    owner,
                    cursor,
                    options,
                    respond_to,
                } => {
                    let result = self.ledger.owned_objects(&owner, cursor.as_ref(), options);
                    match &result {
                        Ok(page) => debug!(
                            %owner,
                            count = page.data.len(),
                            has_next_page = page.has_next_page,
                            "OwnedObjects"
                        ),
                        Err(e) => warn!(%owner, error = %e, "OwnedObjects failed"),
                    }
                    let _ = respond_to.send(result);
                }
                NetworkRequest::Balance {
                    owner,
                    coin_type,
                    respond_to,
                } => {
                    let balance = self.ledger.balance(&owner, &coin_type);
                    debug!(%owner, %coin_type, total = balance.total_balance, "Balance");
                    let _ = respond_to.send(Ok(balance));
                }
                NetworkRequest::Execute {
                    sender,
                    batch,
                    options,
                    request_type,
                    respond_to,
                } => {
                    debug!(%sender, ?request_type, commands = batch.commands().len(), "Execute");
                    let result = self.ledger.execute(&sender, &batch, options);
                    match &result {
                        Ok(response) => info!(%sender, digest = %response.digest, "Executed"),
                        Err(e) => warn!(%sender, error = %e, "Rejected"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(objects = self.ledger.len(), "Shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScriptConfig;
    use crate::model::{ExecuteOptions, RequestType, TransactionBatch, GAS_COIN_TYPE};
    use crate::network::NetworkError;

    #[tokio::test]
    async fn node_answers_until_clients_are_dropped() {
        let config = ScriptConfig::default();
        let ids = config.deployment.resolve().unwrap();
        let mut ledger = Ledger::genesis(ids.clone(), 10);
        ledger.mint_gas(config.sender.clone(), 42);

        let (node, client) = LocalNode::new(4, ledger);
        let handle = tokio::spawn(node.run());

        let balance = client
            .get_balance(config.sender.clone(), GAS_COIN_TYPE.to_string())
            .await
            .unwrap();
        assert_eq!(balance.total_balance, 42);
        assert_eq!(balance.coin_object_count, 1);

        let mut batch = TransactionBatch::new();
        let account = batch.move_call(ids.target("bank", "new_account"), vec![]);
        batch.transfer_objects(vec![account], config.sender.clone());
        let response = client
            .sign_and_execute(
                config.sender.clone(),
                batch,
                ExecuteOptions::full(),
                RequestType::WaitForLocalExecution,
            )
            .await
            .unwrap();
        assert_eq!(response.created_of_type(&ids.account_type()).len(), 1);

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn client_reports_closed_node() {
        let config = ScriptConfig::default();
        let ledger = Ledger::genesis(config.deployment.resolve().unwrap(), 10);
        let (node, client) = LocalNode::new(4, ledger);
        drop(node);

        let err = client
            .get_balance(config.sender, GAS_COIN_TYPE.to_string())
            .await
            .unwrap_err();
        assert_eq!(err, NetworkError::NodeClosed);
    }
}
