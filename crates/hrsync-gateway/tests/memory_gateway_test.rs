//! Behaviour of the in-memory backend that the state-container tests rely on.

use hrsync_core::types::{EmployeeFilters, FilterPatch, SyncAction};
use hrsync_gateway::memory::{GatewayCall, Operation};
use hrsync_gateway::{GatewayError, HrGateway, MemoryGateway};

#[tokio::test]
async fn demo_roster_matches_summary() {
    let gw = MemoryGateway::demo();
    let summary = gw.check_sync().await.unwrap();

    assert_eq!(summary.total_employees, 5);
    assert_eq!(summary.need_sync, 2);
    assert_eq!(summary.already_synced, 3);
    assert!(summary.is_consistent());
    assert_eq!(summary.sync_needs[0].action, SyncAction::Insert);
    assert_eq!(summary.sync_needs[0].full_name, "Le Van Cuong");

    let depts = gw.list_departments().await.unwrap();
    let it = depts.iter().find(|d| d.department_id == 1).unwrap();
    assert_eq!(it.employee_count, 3);
}

#[tokio::test]
async fn filters_are_applied_server_side() {
    let gw = MemoryGateway::demo();

    let mut filters = EmployeeFilters::default();
    filters.merge(FilterPatch::department(Some(1)));
    assert_eq!(gw.list_employees(&filters).await.unwrap().len(), 3);

    filters.merge(FilterPatch::search("VAN"));
    let found = gw.list_employees(&filters).await.unwrap();
    let ids: Vec<_> = found.iter().map(|e| e.employee_id).collect();
    assert_eq!(ids, vec![1, 3, 5]);

    filters.merge(FilterPatch::search("dung"));
    assert!(gw.list_employees(&filters).await.unwrap().is_empty());

    assert_eq!(gw.call_count(Operation::ListEmployees), 3);
}

#[tokio::test]
async fn execute_resolves_needs_and_counts_unknown_ids_as_failed() {
    let gw = MemoryGateway::demo();

    let result = gw.execute_sync(&[3, 5, 99]).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.synced_count, 2);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.details.len(), 3);
    assert_eq!(result.details[2].status, "failed");

    assert!(gw.pending_needs().is_empty());
    let summary = gw.check_sync().await.unwrap();
    assert_eq!(summary.need_sync, 0);
    assert_eq!(summary.already_synced, 5);

    assert_eq!(
        gw.calls().first(),
        Some(&GatewayCall::ExecuteSync(vec![3, 5, 99]))
    );
}

#[tokio::test]
async fn injected_failures_are_recorded_and_recoverable() {
    let gw = MemoryGateway::demo();
    gw.fail(Operation::CheckSync, "connection refused");

    let err = gw.check_sync().await.unwrap_err();
    assert!(matches!(err, GatewayError::Unavailable(ref m) if m == "connection refused"));
    assert_eq!(gw.call_count(Operation::CheckSync), 1);

    gw.recover(Operation::CheckSync);
    assert!(gw.check_sync().await.is_ok());
}

#[tokio::test]
async fn missing_employee_is_not_found() {
    let gw = MemoryGateway::demo();
    let detail = gw.get_employee(4).await.unwrap();
    assert_eq!(detail.department_id, Some(3));
    assert_eq!(detail.department_name.as_deref(), Some("Accounting"));

    let err = gw.get_employee(404).await.unwrap_err();
    assert!(err.is_not_found());
}
