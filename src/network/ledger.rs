//! # Ledger
//!
//! Object store of the local node and the interpreter that executes batches
//! against it.
//!
//! Execution runs on a scratch copy of the ledger which replaces the real one
//! only when every command succeeded, so a batch lands completely or not at
//! all. Two kinds of failure exist:
//!
//! - **Rejections** (missing input objects, inputs the sender may not use,
//!   splitting more than a coin holds, no gas coin) are returned as
//!   [`NetworkError`]s, the way a node refuses a transaction.
//! - **Aborts** (unknown functions, wrongly typed arguments, objects created
//!   but never transferred) produce a response whose status is `failure`.
//!
//! Only the three bank entry functions are understood, with the bookkeeping
//! needed to move objects around: `new_account`, `deposit` and `borrow`.

use super::NetworkError;
use crate::config::BankIds;
use crate::model::{
    coin_object_type, Argument, CallArg, CoinBalance, Command, ExecuteOptions, ExecutionStatus,
    MoveTarget, ObjectChange, ObjectDataOptions, ObjectId, ObjectPage, ObjectRecord, Owner,
    PureValue, SuiAddress, TransactionBatch, TransactionEffects, TransactionResponse,
    GAS_COIN_TYPE,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    Coin { balance: u64 },
    Account { deposit: u64, debt: u64 },
    Bank { balance: u64 },
    CapWrapper { minted: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerObject {
    pub id: ObjectId,
    pub version: u64,
    pub object_type: String,
    /// `None` while a new object is still held by the executing batch.
    pub owner: Option<Owner>,
    pub contents: Contents,
}

impl LedgerObject {
    fn record(&self, options: ObjectDataOptions) -> ObjectRecord {
        ObjectRecord {
            object_id: self.id.clone(),
            version: self.version,
            object_type: options.show_type.then(|| self.object_type.clone()),
            owner: if options.show_owner { self.owner.clone() } else { None },
        }
    }

    fn is_owned_by(&self, address: &SuiAddress) -> bool {
        self.owner.as_ref().is_some_and(|owner| owner.is_owned_by(address))
    }
}

#[derive(Debug, Clone)]
pub struct Ledger {
    ids: BankIds,
    /// Objects keyed by insertion sequence; owned-object pages follow this order.
    objects: BTreeMap<u64, LedgerObject>,
    index: HashMap<ObjectId, u64>,
    next_seq: u64,
    next_object: u64,
    transactions: u64,
    page_size: usize,
}

impl Ledger {
    /// Publishes the bank: the bank singleton and the capability wrapper are
    /// shared under their configured ids.
    pub fn genesis(ids: BankIds, page_size: usize) -> Self {
        let shared = Owner::Shared {
            initial_shared_version: 1,
        };
        let bank = LedgerObject {
            id: ids.bank.clone(),
            version: 1,
            object_type: ids.bank_type(),
            owner: Some(shared.clone()),
            contents: Contents::Bank { balance: 0 },
        };
        let cap_wrapper = LedgerObject {
            id: ids.cap_wrapper.clone(),
            version: 1,
            object_type: ids.cap_wrapper_type(),
            owner: Some(shared),
            contents: Contents::CapWrapper { minted: 0 },
        };

        let mut ledger = Self {
            ids,
            objects: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
            next_object: 1,
            transactions: 0,
            page_size: page_size.max(1),
        };
        ledger.insert(bank);
        ledger.insert(cap_wrapper);
        ledger
    }

    /// Creates a gas coin of `balance` owned by `owner`.
    pub fn mint_gas(&mut self, owner: SuiAddress, balance: u64) -> ObjectId {
        let id = self.fresh_id();
        self.insert(LedgerObject {
            id: id.clone(),
            version: 1,
            object_type: coin_object_type(GAS_COIN_TYPE),
            owner: Some(Owner::AddressOwner(owner)),
            contents: Contents::Coin { balance },
        });
        id
    }

    pub fn object(&self, id: &ObjectId) -> Option<&LedgerObject> {
        self.index.get(id).and_then(|seq| self.objects.get(seq))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// One page of the objects owned by `owner`, in creation order.
    pub fn owned_objects(
        &self,
        owner: &SuiAddress,
        cursor: Option<&ObjectId>,
        options: ObjectDataOptions,
    ) -> Result<ObjectPage, NetworkError> {
        let start = match cursor {
            Some(cursor) => self
                .index
                .get(cursor)
                .map(|seq| seq + 1)
                .ok_or_else(|| NetworkError::InvalidCursor(cursor.clone()))?,
            None => 0,
        };

        let mut owned = self
            .objects
            .range(start..)
            .map(|(_, object)| object)
            .filter(|object| object.is_owned_by(owner));
        let data: Vec<ObjectRecord> = owned
            .by_ref()
            .take(self.page_size)
            .map(|object| object.record(options))
            .collect();
        let has_next_page = owned.next().is_some();
        let next_cursor = data.last().map(|record| record.object_id.clone());

        Ok(ObjectPage {
            data,
            next_cursor,
            has_next_page,
        })
    }

    pub fn balance(&self, owner: &SuiAddress, coin_type: &str) -> CoinBalance {
        let object_type = coin_object_type(coin_type);
        self.objects
            .values()
            .filter(|object| object.object_type == object_type && object.is_owned_by(owner))
            .fold(CoinBalance::empty(coin_type), |mut total, object| {
                if let Contents::Coin { balance } = object.contents {
                    total.total_balance += u128::from(balance);
                    total.coin_object_count += 1;
                }
                total
            })
    }

    /// Executes `batch` as `sender`, committing its effects only on success.
    pub fn execute(
        &mut self,
        sender: &SuiAddress,
        batch: &TransactionBatch,
        options: ExecuteOptions,
    ) -> Result<TransactionResponse, NetworkError> {
        self.transactions += 1;
        let digest = format!("digest_{}", self.transactions);

        let mut scratch = self.clone();
        let outcome = Execution::new(&mut scratch, sender, batch)
            .and_then(|execution| execution.run(batch));
        let (status, changes) = match outcome {
            Ok(changes) => {
                *self = scratch;
                (ExecutionStatus::Success, changes)
            }
            Err(Abort::Rejected(e)) => return Err(e),
            Err(Abort::Failed(error)) => (ExecutionStatus::Failure { error }, Vec::new()),
        };

        Ok(TransactionResponse {
            digest: digest.clone(),
            object_changes: options.show_object_changes.then_some(changes),
            effects: options.show_effects.then(|| TransactionEffects {
                transaction_digest: digest,
                status,
            }),
        })
    }

    fn insert(&mut self, object: LedgerObject) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(object.id.clone(), seq);
        self.objects.insert(seq, object);
    }

    fn remove(&mut self, id: &ObjectId) -> Option<LedgerObject> {
        let seq = self.index.remove(id)?;
        self.objects.remove(&seq)
    }

    fn get_mut(&mut self, id: &ObjectId) -> Option<&mut LedgerObject> {
        let seq = self.index.get(id)?;
        self.objects.get_mut(seq)
    }

    fn fresh_id(&mut self) -> ObjectId {
        loop {
            let id = ObjectId::from_index(self.next_object);
            self.next_object += 1;
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }
}

enum Abort {
    Rejected(NetworkError),
    Failed(String),
}

impl From<NetworkError> for Abort {
    fn from(e: NetworkError) -> Self {
        Abort::Rejected(e)
    }
}

fn failed(message: impl Into<String>) -> Abort {
    Abort::Failed(message.into())
}

#[derive(Debug, Clone)]
enum Value {
    Object(ObjectId),
    U64(u64),
    Address(SuiAddress),
}

/// State of one batch being interpreted against a scratch ledger.
struct Execution<'a> {
    ledger: &'a mut Ledger,
    ids: BankIds,
    sender: SuiAddress,
    gas_coin: ObjectId,
    inputs: Vec<Value>,
    results: Vec<Vec<Value>>,
    created: Vec<ObjectId>,
    mutated: Vec<ObjectId>,
    transferred: Vec<ObjectId>,
    deleted: Vec<LedgerObject>,
    lamport: u64,
}

impl<'a> Execution<'a> {
    fn new(
        ledger: &'a mut Ledger,
        sender: &SuiAddress,
        batch: &TransactionBatch,
    ) -> Result<Self, Abort> {
        let gas_type = coin_object_type(GAS_COIN_TYPE);
        let gas = ledger
            .objects
            .values()
            .find(|object| object.object_type == gas_type && object.is_owned_by(sender))
            .ok_or_else(|| {
                NetworkError::InvalidTransaction(format!("no gas coin owned by {}", sender))
            })?;
        let gas_coin = gas.id.clone();
        let mut max_version = gas.version;

        let mut inputs = Vec::with_capacity(batch.inputs().len());
        for input in batch.inputs() {
            let value = match input {
                CallArg::Pure(PureValue::U64(value)) => Value::U64(*value),
                CallArg::Pure(PureValue::Address(address)) => Value::Address(address.clone()),
                CallArg::Object(id) => {
                    let object = ledger
                        .object(id)
                        .ok_or_else(|| NetworkError::ObjectNotFound(id.clone()))?;
                    let usable = match &object.owner {
                        Some(Owner::AddressOwner(owner)) => owner == sender,
                        Some(Owner::Shared { .. }) | Some(Owner::Immutable) => true,
                        None => false,
                    };
                    if !usable {
                        return Err(NetworkError::InvalidOwnership {
                            object_id: id.clone(),
                            sender: sender.clone(),
                        }
                        .into());
                    }
                    max_version = max_version.max(object.version);
                    Value::Object(id.clone())
                }
            };
            inputs.push(value);
        }

        Ok(Self {
            ids: ledger.ids.clone(),
            ledger,
            sender: sender.clone(),
            mutated: vec![gas_coin.clone()],
            gas_coin,
            inputs,
            results: Vec::new(),
            created: Vec::new(),
            transferred: Vec::new(),
            deleted: Vec::new(),
            lamport: max_version + 1,
        })
    }

    fn run(mut self, batch: &TransactionBatch) -> Result<Vec<ObjectChange>, Abort> {
        for command in batch.commands() {
            let values = match command {
                Command::SplitCoins { coin, amounts } => self.split_coins(*coin, amounts)?,
                Command::MoveCall { target, arguments } => self.move_call(target, arguments)?,
                Command::TransferObjects { objects, recipient } => {
                    self.transfer_objects(objects, *recipient)?
                }
            };
            self.results.push(values);
        }

        for id in &self.created {
            if let Some(object) = self.ledger.object(id) {
                if object.owner.is_none() {
                    return Err(failed(format!(
                        "UnusedValueWithoutDrop: {} of type {} was neither transferred nor consumed",
                        id, object.object_type
                    )));
                }
            }
        }

        Ok(self.finish())
    }

    fn split_coins(&mut self, coin: Argument, amounts: &[Argument]) -> Result<Vec<Value>, Abort> {
        let coin_id = self.object_value(coin)?;
        let amounts = amounts
            .iter()
            .map(|amount| self.u64_value(*amount))
            .collect::<Result<Vec<_>, _>>()?;
        let required = amounts
            .iter()
            .try_fold(0u64, |total, amount| total.checked_add(*amount))
            .ok_or_else(|| failed("split amounts overflow"))?;

        let object = self.existing(&coin_id)?;
        let object_type = object.object_type.clone();
        let Contents::Coin { balance } = object.contents else {
            return Err(failed(format!("{} is not a coin", coin_id)));
        };
        if required > balance {
            return Err(NetworkError::InsufficientCoinBalance {
                required,
                available: balance,
            }
            .into());
        }

        self.existing_mut(&coin_id)?.contents = Contents::Coin {
            balance: balance - required,
        };
        self.mark_mutated(&coin_id);

        Ok(amounts
            .into_iter()
            .map(|amount| {
                Value::Object(self.create(object_type.clone(), Contents::Coin { balance: amount }))
            })
            .collect())
    }

    fn move_call(
        &mut self,
        target: &MoveTarget,
        arguments: &[Argument],
    ) -> Result<Vec<Value>, Abort> {
        if target.package != self.ids.package {
            return Err(failed(format!("package {} not found", target.package)));
        }

        match (target.module.as_str(), target.function.as_str()) {
            ("bank", "new_account") => {
                expect_arity(target, arguments, 0)?;
                let account = self.create(
                    self.ids.account_type(),
                    Contents::Account {
                        deposit: 0,
                        debt: 0,
                    },
                );
                Ok(vec![Value::Object(account)])
            }
            ("bank", "deposit") => {
                expect_arity(target, arguments, 3)?;
                let bank = self.typed_object(arguments[0], &self.ids.bank_type())?;
                let account = self.typed_object(arguments[1], &self.ids.account_type())?;
                let coin = self.typed_object(arguments[2], &coin_object_type(GAS_COIN_TYPE))?;

                let Contents::Coin { balance: amount } = self.consume(&coin)?.contents else {
                    return Err(failed(format!("{} is not a coin", coin)));
                };
                if let Contents::Bank { balance } = &mut self.existing_mut(&bank)?.contents {
                    *balance = checked_add(*balance, amount)?;
                }
                if let Contents::Account { deposit, .. } = &mut self.existing_mut(&account)?.contents {
                    *deposit = checked_add(*deposit, amount)?;
                }
                self.mark_mutated(&bank);
                self.mark_mutated(&account);
                Ok(Vec::new())
            }
            ("bank", "borrow") => {
                expect_arity(target, arguments, 3)?;
                let account = self.typed_object(arguments[0], &self.ids.account_type())?;
                let cap = self.typed_object(arguments[1], &self.ids.cap_wrapper_type())?;
                let amount = self.u64_value(arguments[2])?;

                if let Contents::Account { debt, .. } = &mut self.existing_mut(&account)?.contents {
                    *debt = checked_add(*debt, amount)?;
                }
                if let Contents::CapWrapper { minted } = &mut self.existing_mut(&cap)?.contents {
                    *minted = checked_add(*minted, amount)?;
                }
                self.mark_mutated(&account);
                self.mark_mutated(&cap);

                let dollar = self.create(self.ids.dollar_coin_type(), Contents::Coin { balance: amount });
                Ok(vec![Value::Object(dollar)])
            }
            _ => Err(failed(format!("function {} not found", target))),
        }
    }

    fn transfer_objects(
        &mut self,
        objects: &[Argument],
        recipient: Argument,
    ) -> Result<Vec<Value>, Abort> {
        let recipient = match self.resolve(recipient)? {
            Value::Address(address) => address,
            other => return Err(failed(format!("expected an address, found {:?}", other))),
        };

        for argument in objects {
            let id = self.object_value(*argument)?;
            let object = self.existing_mut(&id)?;
            if matches!(object.owner, Some(Owner::Shared { .. }) | Some(Owner::Immutable)) {
                return Err(failed(format!("{} cannot be transferred", id)));
            }
            object.owner = Some(Owner::AddressOwner(recipient.clone()));
            if !self.created.contains(&id) && !self.transferred.contains(&id) {
                self.transferred.push(id);
            }
        }
        Ok(Vec::new())
    }

    fn resolve(&self, argument: Argument) -> Result<Value, Abort> {
        match argument {
            Argument::GasCoin => Ok(Value::Object(self.gas_coin.clone())),
            Argument::Input(index) => self
                .inputs
                .get(index as usize)
                .cloned()
                .ok_or_else(|| failed(format!("input {} out of bounds", index))),
            Argument::Result(index) => match self.results.get(index as usize) {
                Some(values) if values.len() == 1 => Ok(values[0].clone()),
                Some(_) => Err(failed(format!("result {} is not a single value", index))),
                None => Err(failed(format!("result {} is not available", index))),
            },
            Argument::NestedResult(index, nested) => self
                .results
                .get(index as usize)
                .and_then(|values| values.get(nested as usize))
                .cloned()
                .ok_or_else(|| failed(format!("result {}.{} is not available", index, nested))),
        }
    }

    fn object_value(&self, argument: Argument) -> Result<ObjectId, Abort> {
        match self.resolve(argument)? {
            Value::Object(id) => Ok(id),
            other => Err(failed(format!("expected an object, found {:?}", other))),
        }
    }

    fn u64_value(&self, argument: Argument) -> Result<u64, Abort> {
        match self.resolve(argument)? {
            Value::U64(value) => Ok(value),
            other => Err(failed(format!("expected a u64, found {:?}", other))),
        }
    }

    fn typed_object(&self, argument: Argument, expected: &str) -> Result<ObjectId, Abort> {
        let id = self.object_value(argument)?;
        let object = self.existing(&id)?;
        if object.object_type != expected {
            return Err(failed(format!(
                "type mismatch for {}: expected {}, found {}",
                id, expected, object.object_type
            )));
        }
        Ok(id)
    }

    fn existing(&self, id: &ObjectId) -> Result<&LedgerObject, Abort> {
        self.ledger
            .object(id)
            .ok_or_else(|| failed(format!("{} was already consumed", id)))
    }

    fn existing_mut(&mut self, id: &ObjectId) -> Result<&mut LedgerObject, Abort> {
        self.ledger
            .get_mut(id)
            .ok_or_else(|| failed(format!("{} was already consumed", id)))
    }

    fn create(&mut self, object_type: String, contents: Contents) -> ObjectId {
        let id = self.ledger.fresh_id();
        self.ledger.insert(LedgerObject {
            id: id.clone(),
            version: self.lamport,
            object_type,
            owner: None,
            contents,
        });
        self.created.push(id.clone());
        id
    }

    /// Takes an object out of the ledger by value.
    fn consume(&mut self, id: &ObjectId) -> Result<LedgerObject, Abort> {
        if *id == self.gas_coin {
            return Err(failed("the gas coin cannot be taken by value"));
        }
        if matches!(
            self.existing(id)?.owner,
            Some(Owner::Shared { .. }) | Some(Owner::Immutable)
        ) {
            return Err(failed(format!("{} cannot be taken by value", id)));
        }
        let object = self
            .ledger
            .remove(id)
            .ok_or_else(|| failed(format!("{} was already consumed", id)))?;

        if let Some(position) = self.created.iter().position(|created| created == id) {
            self.created.remove(position);
        } else {
            self.mutated.retain(|mutated| mutated != id);
            self.transferred.retain(|transferred| transferred != id);
            self.deleted.push(object.clone());
        }
        Ok(object)
    }

    fn mark_mutated(&mut self, id: &ObjectId) {
        if !self.created.contains(id) && !self.mutated.contains(id) {
            self.mutated.push(id.clone());
        }
    }

    fn finish(self) -> Vec<ObjectChange> {
        let Execution {
            ledger,
            sender,
            created,
            mutated,
            transferred,
            deleted,
            lamport,
            ..
        } = self;
        let mut changes = Vec::new();

        for id in &created {
            if let Some(object) = ledger.get_mut(id) {
                object.version = lamport;
                changes.push(ObjectChange::Created {
                    sender: sender.clone(),
                    owner: object.owner.clone().unwrap_or(Owner::Immutable),
                    object_type: object.object_type.clone(),
                    object_id: id.clone(),
                    version: lamport,
                });
            }
        }
        for id in mutated.iter().filter(|id| !transferred.contains(*id)) {
            if let Some(object) = ledger.get_mut(id) {
                object.version = lamport;
                changes.push(ObjectChange::Mutated {
                    sender: sender.clone(),
                    owner: object.owner.clone().unwrap_or(Owner::Immutable),
                    object_type: object.object_type.clone(),
                    object_id: id.clone(),
                    version: lamport,
                });
            }
        }
        for id in &transferred {
            if let Some(object) = ledger.get_mut(id) {
                object.version = lamport;
                changes.push(ObjectChange::Transferred {
                    sender: sender.clone(),
                    recipient: object.owner.clone().unwrap_or(Owner::Immutable),
                    object_type: object.object_type.clone(),
                    object_id: id.clone(),
                    version: lamport,
                });
            }
        }
        for object in deleted {
            changes.push(ObjectChange::Deleted {
                sender: sender.clone(),
                object_type: object.object_type,
                object_id: object.id,
                version: lamport,
            });
        }
        changes
    }
}

/// Move arithmetic aborts on overflow instead of wrapping.
fn checked_add(left: u64, right: u64) -> Result<u64, Abort> {
    left.checked_add(right).ok_or_else(|| failed("arithmetic overflow"))
}

fn expect_arity(target: &MoveTarget, arguments: &[Argument], arity: usize) -> Result<(), Abort> {
    if arguments.len() == arity {
        Ok(())
    } else {
        Err(failed(format!(
            "{} expects {} arguments, got {}",
            target,
            arity,
            arguments.len()
        )))
    }
}
