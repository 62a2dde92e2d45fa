//! # Transaction Composer
//!
//! Builds the bank batches for one identity and submits them:
//!
//! - [`BankComposer::deposit_and_borrow`]: find or create the account, deposit,
//!   borrow, hand everything to the sender, then report the stablecoin balance.
//! - [`BankComposer::new_account`]: create an account and hand it to the sender.
//!
//! Every submission waits for local execution and asks for object changes and
//! effects, which are logged as JSON.

pub mod account;
pub mod deposit;
pub mod error;
pub mod new_account;
mod report;

pub use account::*;
pub use deposit::*;
pub use error::*;

use crate::config::{BankIds, ConfigError, Deployment};
use crate::model::{
    CoinBalance, ExecuteOptions, ExecutionStatus, RequestType, SuiAddress, TransactionBatch,
    TransactionResponse,
};
use crate::network::NetworkClient;
use tracing::instrument;

#[derive(Clone)]
pub struct BankComposer {
    network: NetworkClient,
    ids: BankIds,
    sender: SuiAddress,
}

impl BankComposer {
    pub fn new(
        network: NetworkClient,
        deployment: &Deployment,
        sender: SuiAddress,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            network,
            ids: deployment.resolve()?,
            sender,
        })
    }

    pub fn sender(&self) -> &SuiAddress {
        &self.sender
    }

    pub fn ids(&self) -> &BankIds {
        &self.ids
    }

    /// Current stablecoin balance of the sender.
    #[instrument(skip(self))]
    pub async fn dollar_balance(&self) -> Result<CoinBalance, BankError> {
        Ok(self
            .network
            .get_balance(self.sender.clone(), self.ids.dollar_type())
            .await?)
    }

    /// Signs and executes `batch` as the sender. A batch that executed but
    /// aborted is turned into [`BankError::ExecutionFailed`] once logged.
    async fn submit(&self, batch: TransactionBatch) -> Result<TransactionResponse, BankError> {
        let response = self
            .network
            .sign_and_execute(
                self.sender.clone(),
                batch,
                ExecuteOptions::full(),
                RequestType::WaitForLocalExecution,
            )
            .await?;
        report::log_response(&response);

        if let Some(ExecutionStatus::Failure { error }) = response.status() {
            return Err(BankError::ExecutionFailed {
                digest: response.digest.clone(),
                error: error.clone(),
            });
        }
        Ok(response)
    }
}
