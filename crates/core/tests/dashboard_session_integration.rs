//! Dashboard session: selection changes, preview slot, sync mutations and
//! polling hand-off.

#[path = "support.rs"]
mod support;

use std::sync::Arc;
use std::time::Duration;

use adsync_core::{
    CacheCoordinator, DashboardSession, MutationStatus, ResourceData, ResourceKind,
    SelectionState,
};
use adsync_domain::{Account, AdSyncError, SelectableAccount, SyncJobStatus};
use chrono::NaiveDate;
use support::{customer, jobs, search_term, Reply, ScriptedPort};

fn session(port: &Arc<ScriptedPort>) -> Arc<DashboardSession> {
    let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    Arc::new(DashboardSession::new(
        CacheCoordinator::new(port.clone()),
        SelectionState::new(today, 30),
        Duration::from_millis(4000),
    ))
}

fn acme() -> SelectableAccount {
    SelectableAccount::new("123", "999", "Acme")
}

fn globex() -> SelectableAccount {
    SelectableAccount::new("456", "999", "Globex")
}

fn account(customer_id: &str, name: &str) -> Account {
    serde_json::from_value(serde_json::json!({
        "customerId": customer_id,
        "descriptiveName": name,
        "isManagerAccount": true,
    }))
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn nothing_is_fetched_before_an_account_is_selected() {
    let port = ScriptedPort::new();
    let session = session(&port);

    assert!(!session.campaigns().await.is_success());
    assert!(!session.stored_terms().await.is_success());
    assert!(!session.sync_jobs().await.is_success());
    assert_eq!(
        session.preview_terms().await.unwrap_err(),
        AdSyncError::missing_param("customerId")
    );
    assert!(matches!(session.sync_search_terms().await, Err(AdSyncError::Validation(_))));

    assert!(port.reads().is_empty());
    assert!(port.search_terms_syncs().is_empty());
}

#[tokio::test(start_paused = true)]
async fn selectable_accounts_merge_stored_and_live() {
    let port = ScriptedPort::new();
    port.push(ResourceKind::Customers, Reply::ok(ResourceData::Customers(vec![customer("123", "Acme")])));
    port.push(
        ResourceKind::Accounts,
        Reply::ok(ResourceData::Accounts(vec![account("123", "Acme live"), account("456", "Globex")])),
    );
    let session = session(&port);

    let accounts = session.selectable_accounts().await;

    assert_eq!(accounts.stored.len(), 1);
    assert_eq!(accounts.stored[0].label, "Acme");
    assert_eq!(accounts.unstored.len(), 1);
    assert_eq!(accounts.unstored[0].login_customer_id, "456");
    assert_eq!(accounts.unstored[0].display_label(), "Globex (456) [MCC]");
}

#[tokio::test(start_paused = true)]
async fn changing_account_resets_preview() {
    let port = ScriptedPort::new();
    port.push(
        ResourceKind::SearchTerms,
        Reply::ok(ResourceData::SearchTerms(vec![search_term("acme boots")])),
    );
    let session = session(&port);

    assert!(session.select_account(acme()).unwrap());
    let terms = session.preview_terms().await.unwrap();
    assert_eq!(terms.len(), 1);
    assert_eq!(session.preview_state().status, MutationStatus::Success);

    assert!(session.select_account(globex()).unwrap());
    let state = session.preview_state();
    assert_eq!(state.status, MutationStatus::Idle);
    assert!(state.data.is_none());
    assert!(state.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn preview_landing_after_account_change_is_dropped() {
    let port = ScriptedPort::new();
    port.push(
        ResourceKind::SearchTerms,
        Reply::ok(ResourceData::SearchTerms(vec![search_term("acme boots")]))
            .after(Duration::from_millis(100)),
    );
    let session = session(&port);
    session.select_account(acme()).unwrap();

    let preview = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.preview_terms().await }
    });
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(session.preview_state().status, MutationStatus::Pending);

    session.select_account(globex()).unwrap();
    assert!(preview.await.unwrap().is_ok());
    assert_eq!(session.preview_state().status, MutationStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn preview_is_not_cached() {
    let port = ScriptedPort::new();
    let session = session(&port);
    session.select_account(acme()).unwrap();
    tokio::time::sleep(Duration::from_millis(1)).await;

    session.preview_terms().await.unwrap();
    session.preview_terms().await.unwrap();

    assert_eq!(port.reads_of(ResourceKind::SearchTerms), 2);
    assert_eq!(session.coordinator().len(), 1); // only the polled sync-jobs entry
}

#[tokio::test(start_paused = true)]
async fn second_sync_while_pending_is_busy() {
    let port = ScriptedPort::new();
    port.delay_syncs(Duration::from_millis(100));
    let session = session(&port);
    session.select_account(acme()).unwrap();

    let first = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.sync_search_terms().await }
    });
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert!(session.is_syncing());
    assert_eq!(
        session.sync_search_terms().await.unwrap_err(),
        AdSyncError::Busy("syncSearchTerms".into())
    );

    let result = first.await.unwrap().unwrap();
    assert_eq!(result.customer_id, "123");
    assert_eq!(result.start_date, "2024-01-01");
    assert_eq!(result.end_date, "2024-01-31");
    assert!(!session.is_syncing());
    assert_eq!(port.search_terms_syncs().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn sync_restarts_polling_for_selected_customer() {
    let port = ScriptedPort::new();
    port.push(ResourceKind::SyncJobs, Reply::ok(jobs(&[SyncJobStatus::Completed])));
    port.push(ResourceKind::SyncJobs, Reply::ok(jobs(&[SyncJobStatus::Running])));
    let session = session(&port);
    session.select_account(acme()).unwrap();
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(!session.poller().is_running());

    let result = session.sync_account_structure().await.unwrap();
    assert_eq!(result.total_keywords, 42);
    assert_eq!(port.structure_syncs()[0].login_customer_id, "999");

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(session.poller().active_customer().as_deref(), Some("123"));
    assert_eq!(session.structure_sync_state().status, MutationStatus::Success);
}

#[tokio::test(start_paused = true)]
async fn failed_sync_records_error_and_keeps_cache() {
    let port = ScriptedPort::new();
    port.fail_syncs(AdSyncError::upstream(500, "upstream down"));
    let session = session(&port);
    session.customers().await;
    session.select_account(acme()).unwrap();

    let err = session.sync_search_terms().await.unwrap_err();

    assert_eq!(err, AdSyncError::upstream(500, "upstream down"));
    let state = session.search_terms_sync_state();
    assert_eq!(state.status, MutationStatus::Error);
    assert_eq!(state.error, Some(err));
    assert!(session.customers().await.is_success());
    assert_eq!(port.reads_of(ResourceKind::Customers), 1);
}

#[tokio::test(start_paused = true)]
async fn clearing_selection_stops_polling() {
    let port = ScriptedPort::new();
    for _ in 0..3 {
        port.push(ResourceKind::SyncJobs, Reply::ok(jobs(&[SyncJobStatus::Running])));
    }
    let session = session(&port);
    session.select_account(acme()).unwrap();
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(session.poller().is_running());

    assert!(session.clear_selection());
    tokio::time::sleep(Duration::from_secs(20)).await;

    assert!(!session.poller().is_running());
    assert_eq!(port.reads_of(ResourceKind::SyncJobs), 1);
    assert!(session.selection().account().is_none());
}

#[tokio::test(start_paused = true)]
async fn refresh_refetches_account_lists() {
    let port = ScriptedPort::new();
    let session = session(&port);
    session.customers().await;
    session.accounts().await;

    assert_eq!(session.refresh(), 2);
    session.customers().await;

    assert_eq!(port.reads_of(ResourceKind::Customers), 2);
}

#[tokio::test]
async fn reversed_date_range_is_rejected() {
    let port = ScriptedPort::new();
    let session = session(&port);

    assert!(matches!(
        session.set_date_range("2024-03-01", "2024-02-01"),
        Err(AdSyncError::Validation(_))
    ));
    session.set_date_range("2024-02-01", "2024-02-29").unwrap();
    assert_eq!(session.selection().range().end_ymd(), "2024-02-29");
}

#[test]
fn selection_is_restored_when_polling_cannot_start() {
    let port = ScriptedPort::new();
    let session = session(&port);
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    runtime.block_on(async { session.select_account(acme()).unwrap() });
    drop(runtime);
    let before = session.selection();

    let err = session.select_account(globex()).unwrap_err();

    assert!(matches!(err, AdSyncError::Internal(_)));
    assert_eq!(session.selection(), before);
    assert_eq!(session.selection().customer_id(), Some("123"));
}
