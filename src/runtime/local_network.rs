use crate::config::{ConfigError, ScriptConfig};
use crate::network::{Ledger, LocalNode, NetworkClient};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// A running local node and the client connected to it.
///
/// Starting the network publishes the bank under the configured ids and
/// mints one gas coin to the configured sender:
///
/// ```ignore
/// let network = LocalNetwork::start(&config)?;
/// let composer = BankComposer::new(network.client(), &config.deployment, config.sender.clone())?;
/// // ...
/// drop(composer);
/// network.shutdown().await?;
/// ```
pub struct LocalNetwork {
    client: NetworkClient,
    handle: JoinHandle<()>,
}

impl LocalNetwork {
    pub fn start(config: &ScriptConfig) -> Result<Self, ConfigError> {
        let ids = config.deployment.resolve()?;
        let mut ledger = Ledger::genesis(ids, config.node.page_size);
        let gas = ledger.mint_gas(config.sender.clone(), config.node.gas_balance);
        info!(sender = %config.sender, %gas, balance = config.node.gas_balance, "Gas coin minted");

        let (node, client) = LocalNode::new(config.node.channel_capacity.max(1), ledger);
        let handle = tokio::spawn(node.run());

        Ok(Self { client, handle })
    }

    pub fn client(&self) -> NetworkClient {
        self.client.clone()
    }

    /// Drops this handle's client and waits for the node to stop.
    ///
    /// The node only stops once every other clone of the client is gone too.
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        info!("Shutting down local network...");
        let Self { client, handle } = self;
        drop(client);

        if let Err(e) = handle.await {
            error!("Node task failed: {:?}", e);
            return Err(e);
        }

        info!("Local network shutdown complete.");
        Ok(())
    }
}
