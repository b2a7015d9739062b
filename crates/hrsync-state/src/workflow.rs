//! Sync workflow state machine over the check and execute calls.
//!
//! ```text
//! Idle -> Checking -> NeedsReview | AllSynced | CheckFailed
//!         Executing -> ExecuteSucceeded | ExecuteFailed
//! ```
//!
//! At most one operation is in flight. The guard is taken inside the watch
//! lock, so two concurrent callers can never both pass it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use hrsync_core::types::{EmployeeId, SyncNeed, SyncResult, SyncStatusSummary};
use hrsync_gateway::HrGateway;

use crate::error::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    Checking,
    NeedsReview,
    AllSynced,
    CheckFailed,
    Executing,
    ExecuteSucceeded,
    ExecuteFailed,
}

impl SyncPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, SyncPhase::Checking | SyncPhase::Executing)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    pub phase: SyncPhase,
    pub summary: Option<SyncStatusSummary>,
    pub sync_needs: Vec<SyncNeed>,
    pub syncing: bool,
    pub error: Option<String>,
    pub last_result: Option<SyncResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    NeedsReview(usize),
    AllSynced,
    Failed(String),
    /// Another operation was in flight; no request was made
    Busy,
}

pub struct SyncWorkflow {
    gateway: Arc<dyn HrGateway>,
    state: watch::Sender<WorkflowState>,
}

impl SyncWorkflow {
    pub fn new(gateway: Arc<dyn HrGateway>) -> Self {
        Self {
            gateway,
            state: watch::Sender::new(WorkflowState::default()),
        }
    }

    pub fn snapshot(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// Enter `phase` unless something is already in flight.
    fn begin(&self, phase: SyncPhase, clear_result: bool) -> bool {
        self.state.send_if_modified(|s| {
            if s.syncing {
                return false;
            }
            s.syncing = true;
            s.phase = phase;
            s.error = None;
            if clear_result {
                s.last_result = None;
            }
            true
        })
    }

    pub async fn check_sync(&self) -> CheckOutcome {
        if !self.begin(SyncPhase::Checking, true) {
            debug!("check_sync ignored: operation in flight");
            return CheckOutcome::Busy;
        }

        let result = self.gateway.check_sync().await;

        let mut outcome = CheckOutcome::AllSynced;
        self.state.send_modify(|s| {
            s.syncing = false;
            match result {
                Ok(summary) => {
                    if !summary.is_consistent() {
                        warn!(
                            total = summary.total_employees,
                            need_sync = summary.need_sync,
                            already_synced = summary.already_synced,
                            "sync summary counts do not add up"
                        );
                    }
                    s.sync_needs = summary.sync_needs.clone();
                    s.summary = Some(summary);
                    if s.sync_needs.is_empty() {
                        s.phase = SyncPhase::AllSynced;
                    } else {
                        s.phase = SyncPhase::NeedsReview;
                        outcome = CheckOutcome::NeedsReview(s.sync_needs.len());
                    }
                    debug!(needs = s.sync_needs.len(), "sync check complete");
                }
                Err(e) => {
                    warn!("sync check failed: {e}");
                    let msg = e.to_string();
                    // stale-but-visible: summary and need list are kept
                    s.error = Some(msg.clone());
                    s.phase = SyncPhase::CheckFailed;
                    outcome = CheckOutcome::Failed(msg);
                }
            }
        });
        outcome
    }

    /// Send `employee_ids` to the backend. Does not re-check; see
    /// [`crate::SyncCenter::execute_selected`] for the full sequence.
    pub async fn execute_sync(&self, employee_ids: &[EmployeeId]) -> Result<SyncResult, SyncError> {
        if employee_ids.is_empty() {
            return Err(SyncError::EmptySelection);
        }
        if !self.begin(SyncPhase::Executing, false) {
            return Err(SyncError::Busy);
        }
        info!(count = employee_ids.len(), "executing sync");

        match self.gateway.execute_sync(employee_ids).await {
            Ok(result) => {
                info!(
                    synced = result.synced_count,
                    failed = result.failed_count,
                    success = result.success,
                    "sync executed"
                );
                self.state.send_modify(|s| {
                    s.syncing = false;
                    s.phase = SyncPhase::ExecuteSucceeded;
                    s.last_result = Some(result.clone());
                });
                Ok(result)
            }
            Err(e) => {
                warn!("sync execution failed: {e}");
                self.state.send_modify(|s| {
                    s.syncing = false;
                    s.phase = SyncPhase::ExecuteFailed;
                    s.error = Some(e.to_string());
                });
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrsync_gateway::memory::Operation;
    use hrsync_gateway::MemoryGateway;

    fn workflow() -> (Arc<MemoryGateway>, SyncWorkflow) {
        let gw = Arc::new(MemoryGateway::demo());
        let wf = SyncWorkflow::new(gw.clone());
        (gw, wf)
    }

    #[tokio::test]
    async fn starts_idle() {
        let (_, wf) = workflow();
        let s = wf.snapshot();
        assert_eq!(s.phase, SyncPhase::Idle);
        assert!(!s.syncing);
        assert!(s.summary.is_none());
    }

    #[tokio::test]
    async fn check_moves_to_needs_review() {
        let (_, wf) = workflow();
        assert_eq!(wf.check_sync().await, CheckOutcome::NeedsReview(2));

        let s = wf.snapshot();
        assert_eq!(s.phase, SyncPhase::NeedsReview);
        assert!(!s.syncing);
        assert_eq!(s.sync_needs.len(), 2);
        assert_eq!(s.summary.unwrap().need_sync, 2);
    }

    #[tokio::test]
    async fn check_with_no_needs_is_all_synced() {
        let gw = Arc::new(MemoryGateway::new().with_department(1, "Ops"));
        let wf = SyncWorkflow::new(gw);
        assert_eq!(wf.check_sync().await, CheckOutcome::AllSynced);
        assert_eq!(wf.snapshot().phase, SyncPhase::AllSynced);
    }

    #[tokio::test]
    async fn failed_check_keeps_previous_needs() {
        let (gw, wf) = workflow();
        wf.check_sync().await;

        gw.fail(Operation::CheckSync, "502 bad gateway");
        let outcome = wf.check_sync().await;
        assert!(matches!(outcome, CheckOutcome::Failed(_)));

        let s = wf.snapshot();
        assert_eq!(s.phase, SyncPhase::CheckFailed);
        assert_eq!(s.sync_needs.len(), 2);
        assert!(s.summary.is_some());
        assert_eq!(s.error.as_deref(), Some("502 bad gateway"));
        assert!(!s.syncing);
    }

    #[tokio::test]
    async fn first_failed_check_has_nothing_to_show() {
        let (gw, wf) = workflow();
        gw.fail(Operation::CheckSync, "refused");
        wf.check_sync().await;
        let s = wf.snapshot();
        assert!(s.summary.is_none());
        assert!(s.sync_needs.is_empty());
    }

    #[tokio::test]
    async fn empty_execute_never_reaches_gateway() {
        let (gw, wf) = workflow();
        let err = wf.execute_sync(&[]).await.unwrap_err();
        assert!(matches!(err, SyncError::EmptySelection));
        assert!(gw.calls().is_empty());
        assert_eq!(wf.snapshot().phase, SyncPhase::Idle);
    }

    #[tokio::test]
    async fn execute_stores_result() {
        let (_, wf) = workflow();
        let result = wf.execute_sync(&[3]).await.unwrap();
        assert_eq!(result.synced_count, 1);

        let s = wf.snapshot();
        assert_eq!(s.phase, SyncPhase::ExecuteSucceeded);
        assert_eq!(s.last_result, Some(result));
        assert!(!s.syncing);
    }

    #[tokio::test]
    async fn failed_execute_stores_error_and_returns_it() {
        let (gw, wf) = workflow();
        gw.fail(Operation::ExecuteSync, "db locked");
        let err = wf.execute_sync(&[3, 5]).await.unwrap_err();
        assert!(matches!(err, SyncError::Gateway(_)));

        let s = wf.snapshot();
        assert_eq!(s.phase, SyncPhase::ExecuteFailed);
        assert_eq!(s.error.as_deref(), Some("db locked"));
        assert!(s.last_result.is_none());
    }

    #[tokio::test]
    async fn next_check_clears_last_result() {
        let (_, wf) = workflow();
        wf.execute_sync(&[5]).await.unwrap();
        wf.check_sync().await;
        assert!(wf.snapshot().last_result.is_none());
    }
}
