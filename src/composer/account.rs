//! Discovery of the identity's bank account.

use super::{BankComposer, BankError};
use crate::config::BankIds;
use crate::model::{Argument, ObjectDataOptions, ObjectId, SuiAddress, TransactionBatch};
use tracing::{debug, instrument};

/// Where the account used by a batch comes from. Exactly one variant is
/// chosen per batch, and later commands use [`AccountRef::argument`] without
/// caring which.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRef {
    /// An account the identity already owns.
    Existing { id: ObjectId, argument: Argument },
    /// Output of a `new_account` call staged in the same batch. It only
    /// exists once the batch commits.
    Created(Argument),
}

impl AccountRef {
    /// References `existing` when given, otherwise stages its creation.
    pub fn stage(batch: &mut TransactionBatch, ids: &BankIds, existing: Option<ObjectId>) -> Self {
        match existing {
            Some(id) => {
                let argument = batch.object(id.clone());
                AccountRef::Existing { id, argument }
            }
            None => AccountRef::Created(batch.move_call(ids.target("bank", "new_account"), vec![])),
        }
    }

    pub fn argument(&self) -> Argument {
        match self {
            AccountRef::Existing { argument, .. } => *argument,
            AccountRef::Created(argument) => *argument,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, AccountRef::Created(_))
    }
}

impl BankComposer {
    /// Finds the first `bank::Account` owned by `owner`, walking owned-object
    /// pages in order and stopping at the page that contains it.
    #[instrument(skip(self))]
    pub async fn resolve_account(&self, owner: &SuiAddress) -> Result<Option<ObjectId>, BankError> {
        let account_type = self.ids.account_type();
        let mut cursor = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .network
                .get_owned_objects(owner.clone(), cursor.take(), ObjectDataOptions::with_type())
                .await?;
            pages += 1;

            let found = page
                .data
                .into_iter()
                .find(|record| record.object_type.as_deref() == Some(account_type.as_str()));
            if let Some(record) = found {
                debug!(pages, account = %record.object_id, "Account found");
                return Ok(Some(record.object_id));
            }

            if !page.has_next_page {
                debug!(pages, "No account found");
                return Ok(None);
            }
            cursor = Some(page.next_cursor.ok_or(BankError::BrokenPagination)?);
        }
    }
}
