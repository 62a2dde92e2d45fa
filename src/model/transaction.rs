//! Staged transaction batches and the structured response of their execution.
//!
//! A [`TransactionBatch`] is an ordered list of commands over a shared input
//! table. Commands refer to inputs, to the gas coin, or to the outputs of
//! earlier commands through [`Argument`]s, so a value produced by one command
//! (a freshly created account, a split coin) can be consumed by a later one
//! before anything is materialized on chain.

use super::object::{ObjectId, Owner, SuiAddress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a value inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Argument {
    /// The coin paying for gas.
    GasCoin,
    /// An entry of the input table.
    Input(u16),
    /// The single output of a command.
    Result(u16),
    /// The `n`-th output of a command returning several values.
    NestedResult(u16, u16),
}

/// A literal value passed to a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PureValue {
    U64(u64),
    Address(SuiAddress),
}

/// Entry of the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CallArg {
    Pure(PureValue),
    Object(ObjectId),
}

/// Fully qualified Move function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveTarget {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
}

impl MoveTarget {
    pub fn new(package: ObjectId, module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            package,
            module: module.into(),
            function: function.into(),
        }
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}

/// One staged operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Command {
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },
    MoveCall {
        target: MoveTarget,
        arguments: Vec<Argument>,
    },
    TransferObjects {
        objects: Vec<Argument>,
        recipient: Argument,
    },
}

/// An ordered set of commands submitted and executed as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionBatch {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
}

impl TransactionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    pub fn pure_u64(&mut self, value: u64) -> Argument {
        self.push_input(CallArg::Pure(PureValue::U64(value)))
    }

    pub fn pure_address(&mut self, address: SuiAddress) -> Argument {
        self.push_input(CallArg::Pure(PureValue::Address(address)))
    }

    /// References an existing object. The same object is only added to the
    /// input table once.
    pub fn object(&mut self, id: ObjectId) -> Argument {
        let existing = self
            .inputs
            .iter()
            .position(|input| matches!(input, CallArg::Object(object_id) if *object_id == id));
        match existing {
            Some(index) => Argument::Input(index as u16),
            None => self.push_input(CallArg::Object(id)),
        }
    }

    /// Splits `amounts` off `coin`, returning one new coin per amount.
    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> Vec<Argument> {
        let count = amounts.len() as u16;
        let index = self.push_command(Command::SplitCoins { coin, amounts });
        (0..count).map(|n| Argument::NestedResult(index, n)).collect()
    }

    pub fn move_call(&mut self, target: MoveTarget, arguments: Vec<Argument>) -> Argument {
        Argument::Result(self.push_command(Command::MoveCall { target, arguments }))
    }

    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: SuiAddress) {
        let recipient = self.pure_address(recipient);
        self.push_command(Command::TransferObjects { objects, recipient });
    }

    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Names of the Move functions called, in staging order.
    pub fn move_calls(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::MoveCall { target, .. } => Some(target.function.as_str()),
                _ => None,
            })
            .collect()
    }

    fn push_input(&mut self, input: CallArg) -> Argument {
        self.inputs.push(input);
        Argument::Input((self.inputs.len() - 1) as u16)
    }

    fn push_command(&mut self, command: Command) -> u16 {
        self.commands.push(command);
        (self.commands.len() - 1) as u16
    }
}

/// Which parts of the response the node should fill in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteOptions {
    pub show_object_changes: bool,
    pub show_effects: bool,
}

impl ExecuteOptions {
    pub fn full() -> Self {
        Self {
            show_object_changes: true,
            show_effects: true,
        }
    }
}

/// How long the submitter waits before the node answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RequestType {
    #[default]
    WaitForLocalExecution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failure { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    pub transaction_digest: String,
    pub status: ExecutionStatus,
}

/// A single object-level effect of an executed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ObjectChange {
    Created {
        sender: SuiAddress,
        owner: Owner,
        object_type: String,
        object_id: ObjectId,
        version: u64,
    },
    Mutated {
        sender: SuiAddress,
        owner: Owner,
        object_type: String,
        object_id: ObjectId,
        version: u64,
    },
    Transferred {
        sender: SuiAddress,
        recipient: Owner,
        object_type: String,
        object_id: ObjectId,
        version: u64,
    },
    Deleted {
        sender: SuiAddress,
        object_type: String,
        object_id: ObjectId,
        version: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_changes: Option<Vec<ObjectChange>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<TransactionEffects>,
}

impl TransactionResponse {
    pub fn status(&self) -> Option<&ExecutionStatus> {
        self.effects.as_ref().map(|effects| &effects.status)
    }

    /// Ids of objects of `object_type` created by this batch.
    pub fn created_of_type(&self, object_type: &str) -> Vec<&ObjectId> {
        self.object_changes
            .iter()
            .flatten()
            .filter_map(|change| match change {
                ObjectChange::Created {
                    object_type: created_type,
                    object_id,
                    ..
                } if created_type == object_type => Some(object_id),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(function: &str) -> MoveTarget {
        MoveTarget::new(ObjectId::from_index(1), "bank", function)
    }

    #[test]
    fn object_inputs_are_deduplicated() {
        let mut batch = TransactionBatch::new();
        let first = batch.object(ObjectId::from_index(7));
        let amount = batch.pure_u64(5);
        let again = batch.object(ObjectId::from_index(7));

        assert_eq!(first, Argument::Input(0));
        assert_eq!(amount, Argument::Input(1));
        assert_eq!(again, first);
        assert_eq!(batch.inputs().len(), 2);
    }

    #[test]
    fn command_outputs_point_at_their_command() {
        let mut batch = TransactionBatch::new();
        let amount = batch.pure_u64(1000);
        let coins = batch.split_coins(batch.gas(), vec![amount]);
        let account = batch.move_call(target("new_account"), vec![]);
        batch.transfer_objects(vec![account], SuiAddress::from_index(9));

        assert_eq!(coins, vec![Argument::NestedResult(0, 0)]);
        assert_eq!(account, Argument::Result(1));
        assert_eq!(batch.commands().len(), 3);
        assert_eq!(
            batch.commands()[2],
            Command::TransferObjects {
                objects: vec![Argument::Result(1)],
                recipient: Argument::Input(1),
            }
        );
        assert_eq!(batch.move_calls(), vec!["new_account"]);
    }

    #[test]
    fn response_serializes_object_changes_with_type_tags() {
        let response = TransactionResponse {
            digest: "digest_1".to_string(),
            object_changes: Some(vec![ObjectChange::Created {
                sender: SuiAddress::new("0xa"),
                owner: Owner::AddressOwner(SuiAddress::new("0xa")),
                object_type: "0xb::bank::Account".to_string(),
                object_id: ObjectId::new("0xc"),
                version: 2,
            }]),
            effects: Some(TransactionEffects {
                transaction_digest: "digest_1".to_string(),
                status: ExecutionStatus::Success,
            }),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["objectChanges"][0]["type"], "created");
        assert_eq!(json["objectChanges"][0]["objectType"], "0xb::bank::Account");
        assert_eq!(json["effects"]["status"], serde_json::json!({ "status": "success" }));
        assert_eq!(response.created_of_type("0xb::bank::Account").len(), 1);
    }
}
