//! Search debouncing on a paused clock.

use std::sync::Arc;
use std::time::Duration;

use hrsync_core::types::EmployeeFilters;
use hrsync_gateway::memory::{GatewayCall, Operation};
use hrsync_gateway::MemoryGateway;
use hrsync_state::{EmployeeDirectory, SearchDebouncer};

const DELAY: Duration = Duration::from_millis(500);

fn setup() -> (Arc<MemoryGateway>, Arc<EmployeeDirectory>, SearchDebouncer) {
    let gw = Arc::new(MemoryGateway::demo());
    let dir = Arc::new(EmployeeDirectory::new(gw.clone()));
    let debouncer = SearchDebouncer::new(dir.clone(), DELAY);
    (gw, dir, debouncer)
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_issues_one_fetch_with_final_text() {
    let (gw, dir, debouncer) = setup();

    debouncer.input("a");
    tokio::time::sleep(Duration::from_millis(100)).await;
    debouncer.input("ab");
    tokio::time::sleep(Duration::from_millis(100)).await;
    debouncer.input("abc");
    assert!(debouncer.is_pending());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(gw.call_count(Operation::ListEmployees), 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        gw.calls(),
        vec![GatewayCall::ListEmployees(EmployeeFilters {
            department_id: None,
            search: "abc".into(),
        })]
    );
    assert_eq!(dir.snapshot().filters.search, "abc");
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn separate_pauses_commit_each_input() {
    let (gw, _dir, debouncer) = setup();

    debouncer.input("an");
    tokio::time::sleep(Duration::from_millis(600)).await;
    debouncer.input("binh");
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(gw.call_count(Operation::ListEmployees), 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_discards_pending_input() {
    let (gw, dir, debouncer) = setup();

    debouncer.input("pham");
    debouncer.cancel();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(gw.call_count(Operation::ListEmployees), 0);
    assert_eq!(dir.snapshot().filters.search, "");
}

#[tokio::test(start_paused = true)]
async fn dropping_the_debouncer_cancels_timer() {
    let (gw, _dir, debouncer) = setup();

    debouncer.input("tran");
    drop(debouncer);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(gw.call_count(Operation::ListEmployees), 0);
}
