//! # Mock Node
//!
//! `MockNetwork` serves the same request channel as [`LocalNode`](super::LocalNode)
//! but answers from a queue of expectations instead of a ledger. Use it to
//! test composition logic: which pages get fetched, what batch is submitted,
//! and how failures are handled, without simulating execution.
//!
//! | | MockNetwork | LocalNode |
//! |---|---|---|
//! | **State** | None (expectations) | Real ledger |
//! | **Error injection** | Easy (`return_err`) | Needs specific state |
//! | **Use case** | Composer logic | End-to-end flows |
//!
//! ```rust
//! use bank_scripts::model::{CoinBalance, SuiAddress};
//! use bank_scripts::network::mock::MockNetwork;
//!
//! #[tokio::main]
//! async fn main() {
//!     let owner = SuiAddress::from_index(1);
//!     let mut mock = MockNetwork::new();
//!     mock.expect_balance(owner.clone())
//!         .return_ok(CoinBalance::empty("0x2::sui::SUI"));
//!
//!     let client = mock.client();
//!     let balance = client.get_balance(owner, "0x2::sui::SUI".to_string()).await.unwrap();
//!     assert_eq!(balance.total_balance, 0);
//!
//!     mock.verify();
//! }
//! ```
//!
//! Expectations are consumed in order. A request that does not match the next
//! expectation panics the mock task, and the caller sees
//! [`NetworkError::NodeDropped`].

use super::{NetworkClient, NetworkError, NetworkRequest};
use crate::model::{
    CoinBalance, ExecuteOptions, ObjectId, ObjectPage, RequestType, SuiAddress, TransactionBatch,
    TransactionResponse,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

enum Expectation {
    OwnedObjects {
        owner: SuiAddress,
        response: Result<ObjectPage, NetworkError>,
    },
    Balance {
        owner: SuiAddress,
        response: Result<CoinBalance, NetworkError>,
    },
    Execute {
        response: Result<TransactionResponse, NetworkError>,
    },
}

/// A request the mock received, kept for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceivedRequest {
    OwnedObjects {
        owner: SuiAddress,
        cursor: Option<ObjectId>,
    },
    Balance {
        owner: SuiAddress,
        coin_type: String,
    },
    Execute {
        sender: SuiAddress,
        batch: TransactionBatch,
        options: ExecuteOptions,
        request_type: RequestType,
    },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

pub struct MockNetwork {
    client: NetworkClient,
    expectations: Expectations,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Default for MockNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNetwork {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<NetworkRequest>(100);
        let expectations: Expectations = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let received_clone = received.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        NetworkRequest::OwnedObjects {
                            owner,
                            cursor,
                            respond_to,
                            ..
                        },
                        Some(Expectation::OwnedObjects {
                            owner: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(owner, expected, "owned objects queried for the wrong owner");
                        received_clone
                            .lock()
                            .unwrap()
                            .push(ReceivedRequest::OwnedObjects { owner, cursor });
                        let _ = respond_to.send(response);
                    }
                    (
                        NetworkRequest::Balance {
                            owner,
                            coin_type,
                            respond_to,
                        },
                        Some(Expectation::Balance {
                            owner: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(owner, expected, "balance queried for the wrong owner");
                        received_clone
                            .lock()
                            .unwrap()
                            .push(ReceivedRequest::Balance { owner, coin_type });
                        let _ = respond_to.send(response);
                    }
                    (
                        NetworkRequest::Execute {
                            sender,
                            batch,
                            options,
                            request_type,
                            respond_to,
                        },
                        Some(Expectation::Execute { response }),
                    ) => {
                        received_clone.lock().unwrap().push(ReceivedRequest::Execute {
                            sender,
                            batch,
                            options,
                            request_type,
                        });
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {:?}", request);
                    }
                }
            }
        });

        Self {
            client: NetworkClient::new(sender),
            expectations,
            received,
            _handle: handle,
        }
    }

    /// Returns a client connected to this mock.
    pub fn client(&self) -> NetworkClient {
        self.client.clone()
    }

    pub fn expect_owned_objects(&mut self, owner: SuiAddress) -> OwnedObjectsExpectation {
        OwnedObjectsExpectation {
            owner,
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_balance(&mut self, owner: SuiAddress) -> BalanceExpectation {
        BalanceExpectation {
            owner,
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_execute(&mut self) -> ExecuteExpectation {
        ExecuteExpectation {
            expectations: self.expectations.clone(),
        }
    }

    /// Every request answered so far, in arrival order.
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }

    /// The batches submitted so far.
    pub fn submitted(&self) -> Vec<TransactionBatch> {
        self.received()
            .into_iter()
            .filter_map(|request| match request {
                ReceivedRequest::Execute { batch, .. } => Some(batch),
                _ => None,
            })
            .collect()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

pub struct OwnedObjectsExpectation {
    owner: SuiAddress,
    expectations: Expectations,
}

impl OwnedObjectsExpectation {
    pub fn return_ok(self, page: ObjectPage) {
        self.push(Ok(page));
    }

    pub fn return_err(self, error: NetworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<ObjectPage, NetworkError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::OwnedObjects {
                owner: self.owner,
                response,
            });
    }
}

pub struct BalanceExpectation {
    owner: SuiAddress,
    expectations: Expectations,
}

impl BalanceExpectation {
    pub fn return_ok(self, balance: CoinBalance) {
        self.push(Ok(balance));
    }

    pub fn return_err(self, error: NetworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<CoinBalance, NetworkError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Balance {
                owner: self.owner,
                response,
            });
    }
}

pub struct ExecuteExpectation {
    expectations: Expectations,
}

impl ExecuteExpectation {
    pub fn return_ok(self, response: TransactionResponse) {
        self.push(Ok(response));
    }

    pub fn return_err(self, error: NetworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<TransactionResponse, NetworkError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Execute { response });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectDataOptions, ObjectRecord};

    #[tokio::test]
    async fn answers_expectations_in_order() {
        let owner = SuiAddress::from_index(1);
        let mut mock = MockNetwork::new();
        mock.expect_owned_objects(owner.clone()).return_ok(ObjectPage {
            data: vec![ObjectRecord::new(ObjectId::from_index(2), 1)],
            next_cursor: Some(ObjectId::from_index(2)),
            has_next_page: false,
        });
        mock.expect_execute()
            .return_err(NetworkError::InvalidTransaction("rejected".to_string()));

        let client = mock.client();
        let page = client
            .get_owned_objects(owner.clone(), None, ObjectDataOptions::with_type())
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);

        let err = client
            .sign_and_execute(
                owner.clone(),
                TransactionBatch::new(),
                ExecuteOptions::full(),
                RequestType::WaitForLocalExecution,
            )
            .await
            .unwrap_err();
        assert_eq!(err, NetworkError::InvalidTransaction("rejected".to_string()));

        mock.verify();
        assert_eq!(mock.submitted(), vec![TransactionBatch::new()]);
        assert_eq!(
            mock.received()[0],
            ReceivedRequest::OwnedObjects {
                owner,
                cursor: None
            }
        );
    }

    #[tokio::test]
    async fn unexpected_request_drops_the_response() {
        let mock = MockNetwork::new();
        let err = mock
            .client()
            .get_balance(SuiAddress::from_index(1), "0x2::sui::SUI".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, NetworkError::NodeDropped);
    }
}
