//! Overlapping requests: responses are applied by issue order, not completion
//! order, and the sync workflow refuses to overlap at all.

mod common;

use std::sync::Arc;

use common::{employee, GatedGateway};
use hrsync_core::types::{EmployeeFilters, SyncStatusSummary};
use hrsync_state::{
    CheckOutcome, EmployeeDirectory, FetchOutcome, SyncError, SyncPhase, SyncWorkflow,
};

fn filters(search: &str) -> EmployeeFilters {
    EmployeeFilters {
        department_id: None,
        search: search.to_string(),
    }
}

/// A slow first fetch that completes after a fast second one must not
/// overwrite the newer list.
#[tokio::test]
async fn slow_stale_fetch_does_not_overwrite_newer_result() {
    let gw = Arc::new(GatedGateway::default());
    let slow = gw.gate_list();
    let fast = gw.gate_list();
    let dir = Arc::new(EmployeeDirectory::new(gw.clone()));

    let d = dir.clone();
    let first = tokio::spawn(async move { d.fetch_employees(filters("a")).await });
    tokio::task::yield_now().await;

    let d = dir.clone();
    let second = tokio::spawn(async move { d.fetch_employees(filters("ab")).await });
    tokio::task::yield_now().await;
    assert_eq!(GatedGateway::count(&gw.list_calls), 2);

    fast.send(vec![employee(2, "Ab Newer")]).unwrap();
    assert_eq!(second.await.unwrap(), FetchOutcome::Applied);
    assert!(!dir.snapshot().loading);

    slow.send(vec![employee(1, "A Older"), employee(2, "Ab Newer")])
        .unwrap();
    assert_eq!(first.await.unwrap(), FetchOutcome::Superseded);

    let s = dir.snapshot();
    assert_eq!(s.employees.len(), 1);
    assert_eq!(s.employees[0].full_name, "Ab Newer");
    assert!(!s.loading);
}

/// Busy flag stays up while the newest request is still in flight.
#[tokio::test]
async fn loading_is_cleared_only_by_latest_request() {
    let gw = Arc::new(GatedGateway::default());
    let older = gw.gate_list();
    let newer = gw.gate_list();
    let dir = Arc::new(EmployeeDirectory::new(gw.clone()));

    let d = dir.clone();
    let first = tokio::spawn(async move { d.fetch_employees(filters("x")).await });
    tokio::task::yield_now().await;
    let d = dir.clone();
    let second = tokio::spawn(async move { d.fetch_employees(filters("xy")).await });
    tokio::task::yield_now().await;

    older.send(vec![employee(1, "X")]).unwrap();
    assert_eq!(first.await.unwrap(), FetchOutcome::Superseded);
    assert!(dir.snapshot().loading);
    assert!(dir.snapshot().employees.is_empty());

    newer.send(vec![employee(3, "Xy")]).unwrap();
    assert_eq!(second.await.unwrap(), FetchOutcome::Applied);
    assert!(!dir.snapshot().loading);
}

#[tokio::test]
async fn workflow_rejects_overlapping_operations() {
    let gw = Arc::new(GatedGateway::default());
    let gate = gw.gate_check();
    let wf = Arc::new(SyncWorkflow::new(gw.clone()));

    let w = wf.clone();
    let running = tokio::spawn(async move { w.check_sync().await });
    tokio::task::yield_now().await;

    let s = wf.snapshot();
    assert_eq!(s.phase, SyncPhase::Checking);
    assert!(s.syncing);

    assert_eq!(wf.check_sync().await, CheckOutcome::Busy);
    assert!(matches!(wf.execute_sync(&[1]).await, Err(SyncError::Busy)));
    assert_eq!(GatedGateway::count(&gw.check_calls), 1);
    assert_eq!(GatedGateway::count(&gw.execute_calls), 0);

    gate.send(SyncStatusSummary {
        total_employees: 4,
        need_sync: 0,
        already_synced: 4,
        sync_needs: Vec::new(),
        checked_at: None,
    })
    .unwrap();
    assert_eq!(running.await.unwrap(), CheckOutcome::AllSynced);
    assert!(!wf.snapshot().syncing);
}
