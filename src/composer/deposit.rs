//! Deposit gas coin as collateral and borrow stablecoin in one batch.

use super::{report, AccountRef, BankComposer, BankError};
use crate::model::{CoinBalance, ObjectId, TransactionBatch, TransactionResponse};
use tracing::{error, info, instrument};

pub const DEFAULT_DEPOSIT_AMOUNT: u64 = 1000;
pub const DEFAULT_BORROW_AMOUNT: u64 = 500;

/// Outcome of [`BankComposer::deposit_and_borrow`].
#[derive(Debug, Clone, PartialEq)]
pub struct BorrowReport {
    /// Result of composing and submitting the batch.
    pub outcome: Result<TransactionResponse, BankError>,
    /// Stablecoin balance fetched after the batch resolved.
    pub balance: CoinBalance,
}

impl BorrowReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl BankComposer {
    /// Stages the deposit/borrow batch for an account that either exists
    /// (`existing`) or gets created in the batch.
    ///
    /// Commands, in order:
    /// 1. `split_coins(gas, [deposit_amount])`
    /// 2. `new_account()` (only without `existing`)
    /// 3. `deposit(bank, account, coin)`
    /// 4. `borrow(account, cap, borrow_amount)`
    /// 5. transfer of the borrowed coin to the sender
    /// 6. transfer of the new account to the sender (only without `existing`)
    pub fn stage_deposit_and_borrow(
        &self,
        existing: Option<ObjectId>,
        deposit_amount: u64,
        borrow_amount: u64,
    ) -> (TransactionBatch, AccountRef) {
        let mut batch = TransactionBatch::new();
        let amount = batch.pure_u64(deposit_amount);
        let coin = batch.split_coins(batch.gas(), vec![amount])[0];

        let account = AccountRef::stage(&mut batch, &self.ids, existing);

        let bank = batch.object(self.ids.bank.clone());
        batch.move_call(
            self.ids.target("bank", "deposit"),
            vec![bank, account.argument(), coin],
        );

        let cap = batch.object(self.ids.cap_wrapper.clone());
        let amount = batch.pure_u64(borrow_amount);
        let dollar = batch.move_call(
            self.ids.target("bank", "borrow"),
            vec![account.argument(), cap, amount],
        );

        batch.transfer_objects(vec![dollar], self.sender.clone());

        // A new account left in the batch would never become reachable.
        if account.is_created() {
            batch.transfer_objects(vec![account.argument()], self.sender.clone());
        }

        (batch, account)
    }

    /// Deposits `deposit_amount` of gas coin and borrows `borrow_amount` of
    /// stablecoin, creating the sender's account first when it has none.
    ///
    /// Failures while composing or submitting are logged and kept in the
    /// report. The balance snapshot is taken in every case, and only an error
    /// fetching it is returned.
    #[instrument(skip(self), fields(sender = %self.sender))]
    pub async fn deposit_and_borrow(
        &self,
        deposit_amount: u64,
        borrow_amount: u64,
    ) -> Result<BorrowReport, BankError> {
        let outcome = self.compose_and_submit(deposit_amount, borrow_amount).await;
        if let Err(e) = &outcome {
            error!(error = ?e, "Deposit and borrow failed");
        }

        let balance = self.dollar_balance().await?;
        report::log_balance(&balance);

        Ok(BorrowReport { outcome, balance })
    }

    async fn compose_and_submit(
        &self,
        deposit_amount: u64,
        borrow_amount: u64,
    ) -> Result<TransactionResponse, BankError> {
        let existing = self.resolve_account(&self.sender).await?;
        let (batch, account) = self.stage_deposit_and_borrow(existing, deposit_amount, borrow_amount);
        info!(
            new_account = account.is_created(),
            commands = batch.commands().len(),
            "Submitting deposit and borrow"
        );
        self.submit(batch).await
    }
}
