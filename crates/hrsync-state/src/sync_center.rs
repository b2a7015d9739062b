//! View-model of the sync screen: the operator's selection and the result of
//! the last execution, on top of a shared [`SyncWorkflow`].
//!
//! `execute_selected` is the whole "execute, wait, re-check, clear" sequence as
//! one async task. The wait uses `tokio::time`, so tests drive it with a
//! paused clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use hrsync_core::types::{EmployeeId, SyncResult};

use crate::error::SyncError;
use crate::selection::Selection;
use crate::workflow::{CheckOutcome, SyncWorkflow};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncCenterState {
    pub selection: Selection,
    /// Result of the last execution; kept on screen until the next one
    pub displayed_result: Option<SyncResult>,
    /// Between a finished execution and its follow-up check
    pub reconciling: bool,
}

pub struct SyncCenter {
    workflow: Arc<SyncWorkflow>,
    state: watch::Sender<SyncCenterState>,
    recheck_delay: Duration,
}

impl SyncCenter {
    pub fn new(workflow: Arc<SyncWorkflow>, recheck_delay: Duration) -> Self {
        Self {
            workflow,
            state: watch::Sender::new(SyncCenterState::default()),
            recheck_delay,
        }
    }

    pub fn workflow(&self) -> &Arc<SyncWorkflow> {
        &self.workflow
    }

    pub fn snapshot(&self) -> SyncCenterState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncCenterState> {
        self.state.subscribe()
    }

    pub fn toggle(&self, id: EmployeeId) {
        self.state.send_modify(|s| {
            s.selection.toggle(id);
        });
    }

    /// Select every employee in the need list as it is right now.
    pub fn select_all(&self) {
        let needs = self.workflow.snapshot().sync_needs;
        self.state.send_modify(|s| s.selection.select_all(&needs));
    }

    /// Header checkbox: clear when everything is selected, otherwise select all.
    pub fn toggle_all(&self) {
        let needs = self.workflow.snapshot().sync_needs;
        self.state.send_modify(|s| {
            if s.selection.is_all_selected(&needs) {
                s.selection.clear();
            } else {
                s.selection.select_all(&needs);
            }
        });
    }

    pub fn clear_selection(&self) {
        self.state.send_if_modified(|s| {
            let had = !s.selection.is_empty();
            s.selection.clear();
            had
        });
    }

    pub fn dismiss_result(&self) {
        self.state
            .send_if_modified(|s| s.displayed_result.take().is_some());
    }

    /// Whether the execute control should be enabled.
    pub fn can_execute(&self) -> bool {
        let s = self.state.borrow();
        !s.selection.is_empty() && !s.reconciling && !self.workflow.snapshot().phase.is_busy()
    }

    pub async fn refresh(&self) -> CheckOutcome {
        self.workflow.check_sync().await
    }

    /// Execute the current selection, show the result, then after the
    /// re-check delay run exactly one check and clear the selection.
    ///
    /// If another check is in flight when the delay ends, the re-check waits
    /// for it and runs once afterwards.
    ///
    /// On failure the selection is kept and no check is scheduled.
    pub async fn execute_selected(&self) -> Result<SyncResult, SyncError> {
        let ids = self.state.borrow().selection.ids();
        let result = self.workflow.execute_sync(&ids).await?;

        self.state.send_modify(|s| {
            s.displayed_result = Some(result.clone());
            s.reconciling = true;
        });

        debug!(delay_ms = self.recheck_delay.as_millis() as u64, "scheduling re-check");
        tokio::time::sleep(self.recheck_delay).await;
        let mut outcome = self.workflow.check_sync().await;
        if outcome == CheckOutcome::Busy {
            // a manual check got in first; run ours once it has finished
            let mut rx = self.workflow.subscribe();
            let _ = rx.wait_for(|s| !s.phase.is_busy()).await;
            outcome = self.workflow.check_sync().await;
        }
        if outcome == CheckOutcome::Busy {
            warn!("re-check after execution skipped: workflow still busy");
        }
        debug!(?outcome, "re-check after execution");

        self.state.send_modify(|s| {
            s.selection.clear();
            s.reconciling = false;
        });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrsync_gateway::MemoryGateway;

    fn center() -> SyncCenter {
        let gw = Arc::new(MemoryGateway::demo());
        SyncCenter::new(Arc::new(SyncWorkflow::new(gw)), Duration::ZERO)
    }

    #[tokio::test]
    async fn toggle_all_flips_between_all_and_none() {
        let c = center();
        c.refresh().await;

        c.toggle_all();
        assert_eq!(c.snapshot().selection.ids(), vec![3, 5]);
        c.toggle_all();
        assert!(c.snapshot().selection.is_empty());

        c.toggle(5);
        c.toggle_all();
        assert_eq!(c.snapshot().selection.len(), 2);
    }

    #[tokio::test]
    async fn execute_control_needs_a_selection() {
        let c = center();
        c.refresh().await;
        assert!(!c.can_execute());
        c.toggle(3);
        assert!(c.can_execute());
    }

    #[tokio::test]
    async fn failed_execute_keeps_selection() {
        let c = center();
        let err = c.execute_selected().await.unwrap_err();
        assert!(matches!(err, SyncError::EmptySelection));
        assert!(c.snapshot().displayed_result.is_none());
    }
}
