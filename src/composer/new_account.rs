//! Account creation on its own.

use super::{BankComposer, BankError};
use crate::model::{TransactionBatch, TransactionResponse};
use tracing::{error, instrument};

impl BankComposer {
    /// `new_account()` followed by a transfer of the new account to the sender.
    pub fn stage_new_account(&self) -> TransactionBatch {
        let mut batch = TransactionBatch::new();
        let account = batch.move_call(self.ids.target("bank", "new_account"), vec![]);
        batch.transfer_objects(vec![account], self.sender.clone());
        batch
    }

    /// Creates a fresh account for the sender. Accounts are never
    /// de-duplicated: each call creates another one.
    #[instrument(skip(self), fields(sender = %self.sender))]
    pub async fn new_account(&self) -> Result<TransactionResponse, BankError> {
        let result = self.submit(self.stage_new_account()).await;
        if let Err(e) = &result {
            error!(error = ?e, "Account creation failed");
        }
        result
    }
}
