//! Store state discipline, exercised against in-memory gateways.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::*;
use financesk_sdk::error::ErrorKind;
use financesk_sdk::models::{AccountQuery, CreateAccountRequest, TransactionType};
use financesk_sdk::{views, FinanceError, LoadFailurePolicy, Store};
use tokio::sync::Notify;

fn account_store(gateway: &Arc<FakeAccountGateway>) -> Store<Arc<FakeAccountGateway>> {
    Store::new("accounts", gateway.clone())
}

fn three_accounts() -> Vec<financesk_sdk::models::Account> {
    vec![
        account(1, "Checking", 10_000, Some("Nubank")),
        account(42, "Savings", 50_000, Some("Itau")),
        account(7, "Wallet", 2_500, None),
    ]
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_replaces_items() {
    let gateway = Arc::new(FakeAccountGateway::new(three_accounts()));
    let store = account_store(&gateway);
    assert!(store.items().is_empty());

    store.load(AccountQuery::for_user(1)).await.unwrap();

    assert_eq!(ids(&store.items()), vec![1, 42, 7]);
    assert!(!store.is_loading());
    assert!(store.last_error().is_none());
    assert!(store.pagination().is_none());
}

#[tokio::test]
async fn failed_load_keeps_previous_items() {
    let gateway = Arc::new(FakeAccountGateway::new(three_accounts()));
    let store = account_store(&gateway);
    store.load(AccountQuery::for_user(1)).await.unwrap();
    let before = store.items();

    gateway.fail_fetch.store(true, Ordering::SeqCst);
    let err = store.load(AccountQuery::for_user(1)).await.unwrap_err();

    assert!(matches!(err, FinanceError::Api { status: 500, .. }));
    assert_eq!(store.items(), before);
    let recorded = store.last_error().unwrap();
    assert_eq!(recorded.kind, ErrorKind::Backend);
    assert_eq!(recorded.status, Some(500));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn failed_load_resets_items_under_reset_policy() {
    let gateway = Arc::new(ScriptedTransactionGateway::new());
    gateway.script(
        0,
        Script::ok(vec![
            transaction(1, 10.0, TransactionType::Income),
            transaction(2, 5.0, TransactionType::Expense),
        ]),
    );
    let store = Store::new("transactions", gateway.clone())
        .with_failure_policy(LoadFailurePolicy::ResetToEmpty);
    store.load(january_search()).await.unwrap();
    assert_eq!(store.items().len(), 2);

    gateway.script(0, Script::failing());
    let err = store.load(january_search()).await.unwrap_err();

    assert!(matches!(err, FinanceError::Timeout));
    assert!(store.items().is_empty());
    let pagination = store.pagination().unwrap();
    assert_eq!(pagination.total_items, 0);
    assert_eq!(pagination.total_pages, 0);
    assert_eq!(store.last_error().unwrap().kind, ErrorKind::Timeout);
}

#[tokio::test]
async fn successful_load_clears_last_error() {
    let gateway = Arc::new(FakeAccountGateway::new(three_accounts()));
    let store = account_store(&gateway);

    gateway.fail_fetch.store(true, Ordering::SeqCst);
    assert!(store.load(AccountQuery::for_user(1)).await.is_err());
    assert!(store.last_error().is_some());

    gateway.fail_fetch.store(false, Ordering::SeqCst);
    store.load(AccountQuery::for_user(1)).await.unwrap();
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn invalid_query_never_reaches_gateway() {
    let gateway = Arc::new(FakeAccountGateway::new(three_accounts()));
    let store = account_store(&gateway);

    let err = store.load(AccountQuery::for_user(0)).await.unwrap_err();

    assert!(matches!(err, FinanceError::Validation { field: "userId", .. }));
    assert_eq!(gateway.call_count(), 0);
    let recorded = store.last_error().unwrap();
    assert_eq!(recorded.kind, ErrorKind::Validation);
    assert_eq!(recorded.field, Some("userId"));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn reversed_date_range_is_rejected_before_fetch() {
    let gateway = Arc::new(ScriptedTransactionGateway::new());
    let store = Store::new("transactions", gateway.clone());
    let mut params = january_search();
    params.start_date = date(2024, 2, 1);

    assert!(store.load(params).await.is_err());
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn reload_repeats_last_query() {
    let gateway = Arc::new(FakeAccountGateway::new(three_accounts()));
    let store = account_store(&gateway);

    assert!(matches!(
        store.reload().await,
        Err(FinanceError::InvalidArgument(_))
    ));

    store.load(AccountQuery::for_user(1)).await.unwrap();
    gateway.accounts.lock().push(account(99, "Added elsewhere", 0, None));
    store.reload().await.unwrap();

    assert_eq!(ids(&store.items()), vec![1, 42, 7, 99]);
    assert_eq!(gateway.call_count(), 2);
}

// ---------------------------------------------------------------------------
// loading flag
// ---------------------------------------------------------------------------

#[tokio::test]
async fn loading_is_true_only_while_in_flight() {
    let gate = Arc::new(Notify::new());
    let gateway = Arc::new(ScriptedTransactionGateway::new());
    gateway.script(
        0,
        Script::ok(vec![transaction(1, 10.0, TransactionType::Income)]).gated(gate.clone()),
    );
    let store = Store::new("transactions", gateway.clone());
    assert!(!store.is_loading());

    let (result, during) = tokio::join!(store.load(january_search()), async {
        gateway.started.notified().await;
        let during = store.is_loading();
        gate.notify_one();
        during
    });

    result.unwrap();
    assert!(during);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn loading_settles_after_failure() {
    let gateway = Arc::new(ScriptedTransactionGateway::new());
    gateway.script(0, Script::failing());
    let store = Store::new("transactions", gateway.clone());

    assert!(store.load(january_search()).await.is_err());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn loading_settles_when_caller_abandons_load() {
    let gate = Arc::new(Notify::new());
    let gateway = Arc::new(ScriptedTransactionGateway::new());
    gateway.script(0, Script::ok(vec![]).gated(gate));
    let store = Store::new("transactions", gateway.clone());

    let outcome =
        tokio::time::timeout(Duration::from_millis(20), store.load(january_search())).await;

    assert!(outcome.is_err());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn subscribers_see_loading_then_items() {
    let gateway = Arc::new(FakeAccountGateway::new(three_accounts()));
    let store = account_store(&gateway);
    let mut changes = store.subscribe();

    store.load(AccountQuery::for_user(1)).await.unwrap();

    assert!(changes.has_changed().unwrap());
    let seen = changes.borrow_and_update();
    assert!(!seen.is_loading());
    assert_eq!(seen.items().len(), 3);
}

// ---------------------------------------------------------------------------
// Request sequencing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn newer_load_supersedes_one_in_flight() {
    let gate = Arc::new(Notify::new());
    let gateway = Arc::new(ScriptedTransactionGateway::new());
    gateway.script(
        0,
        Script::ok(vec![transaction(1, 10.0, TransactionType::Income)]).gated(gate),
    );
    gateway.script(1, Script::ok(vec![transaction(2, 20.0, TransactionType::Expense)]));
    let store = Store::new("transactions", gateway.clone());
    let params = january_search();

    let (first, second) = tokio::join!(store.load(params.with_page(0)), async {
        gateway.started.notified().await;
        store.load(params.with_page(1)).await
    });

    assert!(matches!(first, Err(FinanceError::Superseded)));
    second.unwrap();
    assert_eq!(ids(&store.items()), vec![2]);
    assert_eq!(store.pagination().unwrap().page, 1);
    assert!(store.last_error().is_none());
    assert!(!store.is_loading());
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_appends_and_counts() {
    let gateway = Arc::new(FakeAccountGateway::new(three_accounts()).paginated());
    let store = account_store(&gateway);
    store.load(AccountQuery::for_user(1)).await.unwrap();

    let created = store
        .create(CreateAccountRequest::new(1, "Travel"))
        .await
        .unwrap();

    assert_eq!(store.find(created.account_id).unwrap().account_name, "Travel");
    assert_eq!(store.items().len(), 4);
    assert_eq!(store.pagination().unwrap().total_items, 4);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn update_replaces_local_copy() {
    let gateway = Arc::new(FakeAccountGateway::new(three_accounts()));
    let store = account_store(&gateway);
    store.load(AccountQuery::for_user(1)).await.unwrap();

    let mut payload = CreateAccountRequest::new(1, "Emergency fund");
    payload.account_current_balance = Some(75_000);
    store.update(42, payload).await.unwrap();

    let updated = store.find(42).unwrap();
    assert_eq!(updated.account_name, "Emergency fund");
    assert_eq!(updated.account_current_balance, 75_000);
    assert_eq!(ids(&store.items()), vec![1, 42, 7]);
    assert_eq!(views::total_balance(&store.items()), 10_000 + 75_000 + 2_500);
}

#[tokio::test]
async fn invalid_create_makes_no_call() {
    let gateway = Arc::new(FakeAccountGateway::new(vec![]));
    let store = account_store(&gateway);

    let err = store
        .create(CreateAccountRequest::new(1, "   "))
        .await
        .unwrap_err();

    assert!(matches!(err, FinanceError::Validation { field: "accountName", .. }));
    assert_eq!(gateway.call_count(), 0);
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn failed_write_records_error_and_keeps_items() {
    let gateway = Arc::new(FakeAccountGateway::new(three_accounts()));
    let store = account_store(&gateway);
    store.load(AccountQuery::for_user(1)).await.unwrap();

    gateway.fail_writes.store(true, Ordering::SeqCst);
    assert!(store.remove(42).await.is_err());

    assert_eq!(ids(&store.items()), vec![1, 42, 7]);
    assert_eq!(store.last_error().unwrap().status, Some(500));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn remove_drops_only_the_matching_item() {
    let gateway = Arc::new(FakeAccountGateway::new(three_accounts()).paginated());
    let store = account_store(&gateway);
    store.load(AccountQuery::for_user(1)).await.unwrap();
    assert_eq!(store.pagination().unwrap().total_items, 3);

    store.remove(42).await.unwrap();

    assert_eq!(ids(&store.items()), vec![1, 7]);
    assert_eq!(store.pagination().unwrap().total_items, 2);
}

#[tokio::test]
async fn remove_of_unknown_id_changes_nothing_locally() {
    let gateway = Arc::new(FakeAccountGateway::new(three_accounts()).paginated());
    let store = account_store(&gateway);
    store.load(AccountQuery::for_user(1)).await.unwrap();

    store.remove(1000).await.unwrap();

    assert_eq!(ids(&store.items()), vec![1, 42, 7]);
    assert_eq!(store.pagination().unwrap().total_items, 3);
}
