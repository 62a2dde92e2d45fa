use bank_scripts::composer::{BankComposer, BankError};
use bank_scripts::config::{NodeConfig, ScriptConfig};
use bank_scripts::model::{ObjectDataOptions, ObjectId, Owner};
use bank_scripts::network::{NetworkClient, NetworkError};
use bank_scripts::runtime::LocalNetwork;

fn start(config: &ScriptConfig) -> (LocalNetwork, BankComposer) {
    let network = LocalNetwork::start(config).expect("Failed to start local network");
    let composer = BankComposer::new(network.client(), &config.deployment, config.sender.clone())
        .expect("Invalid deployment");
    (network, composer)
}

async fn owned_accounts(client: &NetworkClient, composer: &BankComposer) -> Vec<ObjectId> {
    let account_type = composer.ids().account_type();
    let mut accounts = Vec::new();
    let mut cursor = None;
    loop {
        let page = client
            .get_owned_objects(composer.sender().clone(), cursor, ObjectDataOptions::with_type())
            .await
            .expect("Failed to list owned objects");
        accounts.extend(
            page.data
                .iter()
                .filter(|record| record.object_type.as_deref() == Some(account_type.as_str()))
                .map(|record| record.object_id.clone()),
        );
        if !page.has_next_page {
            return accounts;
        }
        cursor = page.next_cursor;
    }
}

/// First run for a fresh identity: the account is created, funded and handed
/// over in the same batch.
#[tokio::test]
async fn test_deposit_and_borrow_creates_and_funds_account() {
    let config = ScriptConfig::default();
    let (network, composer) = start(&config);
    let client = network.client();

    assert!(composer.resolve_account(&config.sender).await.unwrap().is_none());

    let report = composer.deposit_and_borrow(1000, 500).await.unwrap();

    assert!(report.is_success(), "{:?}", report.outcome);
    assert_eq!(report.balance.total_balance, 500);
    assert_eq!(report.balance.coin_object_count, 1);

    let response = report.outcome.unwrap();
    let created = response.created_of_type(&composer.ids().account_type());
    assert_eq!(created.len(), 1);

    let accounts = owned_accounts(&client, &composer).await;
    assert_eq!(accounts, vec![created[0].clone()]);
    assert_eq!(
        composer.resolve_account(&config.sender).await.unwrap(),
        Some(created[0].clone())
    );

    drop(client);
    drop(composer);
    network.shutdown().await.expect("Node task failed");
}

/// A second round finds the account from the first one instead of creating
/// another.
#[tokio::test]
async fn test_second_round_reuses_account() {
    let config = ScriptConfig::default();
    let (network, composer) = start(&config);
    let client = network.client();

    let first = composer.deposit_and_borrow(1000, 500).await.unwrap();
    assert!(first.is_success());
    let second = composer.deposit_and_borrow(1000, 500).await.unwrap();
    assert!(second.is_success(), "{:?}", second.outcome);

    let response = second.outcome.unwrap();
    assert!(response
        .created_of_type(&composer.ids().account_type())
        .is_empty());
    assert_eq!(owned_accounts(&client, &composer).await.len(), 1);
    assert_eq!(second.balance.total_balance, 1000);
    assert_eq!(second.balance.coin_object_count, 2);

    drop(client);
    drop(composer);
    network.shutdown().await.expect("Node task failed");
}

/// Account discovery has to follow the cursor when the account is not on the
/// first page.
#[tokio::test]
async fn test_account_found_past_the_first_page() {
    let config = ScriptConfig {
        node: NodeConfig {
            page_size: 1,
            ..NodeConfig::default()
        },
        ..ScriptConfig::default()
    };
    let (network, composer) = start(&config);

    composer.deposit_and_borrow(1000, 500).await.unwrap();
    let report = composer.deposit_and_borrow(1000, 500).await.unwrap();

    assert!(report.is_success(), "{:?}", report.outcome);
    assert_eq!(report.balance.total_balance, 1000);

    drop(composer);
    network.shutdown().await.expect("Node task failed");
}

/// A batch the node refuses leaves nothing behind, and the balance is still
/// reported.
#[tokio::test]
async fn test_insufficient_gas_changes_nothing() {
    let config = ScriptConfig {
        node: NodeConfig {
            gas_balance: 100,
            ..NodeConfig::default()
        },
        ..ScriptConfig::default()
    };
    let (network, composer) = start(&config);
    let client = network.client();

    let report = composer.deposit_and_borrow(1000, 500).await.unwrap();

    assert_eq!(
        report.outcome,
        Err(BankError::Network(NetworkError::InsufficientCoinBalance {
            required: 1000,
            available: 100,
        }))
    );
    assert_eq!(report.balance.total_balance, 0);
    assert!(owned_accounts(&client, &composer).await.is_empty());

    drop(client);
    drop(composer);
    network.shutdown().await.expect("Node task failed");
}

/// Creating accounts is not idempotent.
#[tokio::test]
async fn test_new_account_twice_creates_two_accounts() {
    let config = ScriptConfig::default();
    let (network, composer) = start(&config);
    let client = network.client();
    let account_type = composer.ids().account_type();

    let first = composer.new_account().await.unwrap();
    let second = composer.new_account().await.unwrap();

    let first_id = first.created_of_type(&account_type)[0].clone();
    let second_id = second.created_of_type(&account_type)[0].clone();
    assert_ne!(first_id, second_id);

    let accounts = owned_accounts(&client, &composer).await;
    assert_eq!(accounts, vec![first_id.clone(), second_id]);

    let page = client
        .get_owned_objects(
            config.sender.clone(),
            None,
            ObjectDataOptions {
                show_type: true,
                show_owner: true,
            },
        )
        .await
        .unwrap();
    let record = page
        .data
        .iter()
        .find(|record| record.object_id == first_id)
        .expect("Account not owned by sender");
    assert_eq!(record.owner, Some(Owner::AddressOwner(config.sender.clone())));

    drop(client);
    drop(composer);
    network.shutdown().await.expect("Node task failed");
}

/// An overflowing borrow aborts like any Move abort: the node keeps serving
/// and the next round still works.
#[tokio::test]
async fn test_overflowing_borrow_fails_without_stopping_node() {
    let config = ScriptConfig::default();
    let (network, composer) = start(&config);

    let first = composer.deposit_and_borrow(1000, u64::MAX).await.unwrap();
    assert!(first.is_success(), "{:?}", first.outcome);

    let second = composer.deposit_and_borrow(1000, 1).await.unwrap();
    match &second.outcome {
        Err(BankError::ExecutionFailed { error, .. }) => {
            assert!(error.contains("arithmetic overflow"), "{}", error)
        }
        other => panic!("expected an aborted execution, got {:?}", other),
    }
    assert_eq!(second.balance.total_balance, u128::from(u64::MAX));

    let balance = composer.dollar_balance().await.unwrap();
    assert_eq!(balance.total_balance, u128::from(u64::MAX));

    drop(composer);
    network.shutdown().await.expect("Node task failed");
}
