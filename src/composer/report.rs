//! Console reporting of transaction outcomes.

use crate::model::{CoinBalance, TransactionResponse};
use serde::Serialize;
use tracing::info;

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}

pub(crate) fn log_response(response: &TransactionResponse) {
    info!("result: {}", pretty(&response.object_changes));
    info!("status: {}", pretty(&response.status()));
}

pub(crate) fn log_balance(balance: &CoinBalance) {
    info!("balance: {}", pretty(balance));
}
