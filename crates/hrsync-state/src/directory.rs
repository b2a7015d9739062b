//! Employee directory state: the employee list, the department list used to
//! populate the filter, the active filters, and the busy/error flags.
//!
//! Overlapping list fetches are sequenced by a generation counter: a response
//! is applied only if no newer fetch was issued after it, so a slow early
//! request can never overwrite a fast later one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use hrsync_core::types::{
    Department, Employee, EmployeeDetail, EmployeeFilters, EmployeeId, FilterPatch, SyncStatus,
};
use hrsync_gateway::{GatewayResult, HrGateway};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryState {
    pub employees: Vec<Employee>,
    pub departments: Vec<Department>,
    pub filters: EmployeeFilters,
    pub loading: bool,
    pub error: Option<String>,
    pub selected_employee: Option<EmployeeDetail>,
    pub detail_loading: bool,
    /// Failure of the last detail lookup; independent of the list `error`
    pub detail_error: Option<String>,
}

impl DirectoryState {
    pub fn count_with_status(&self, status: SyncStatus) -> usize {
        self.employees
            .iter()
            .filter(|e| e.sync_status == status)
            .count()
    }

    pub fn department_name(&self, id: i64) -> Option<&str> {
        self.departments
            .iter()
            .find(|d| d.department_id == id)
            .map(|d| d.department_name.as_str())
    }
}

/// What happened to one fetch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer request was issued while this one was in flight; its response was dropped
    Superseded,
    Failed(String),
}

pub struct EmployeeDirectory {
    gateway: Arc<dyn HrGateway>,
    state: watch::Sender<DirectoryState>,
    list_generation: AtomicU64,
    detail_generation: AtomicU64,
}

impl EmployeeDirectory {
    pub fn new(gateway: Arc<dyn HrGateway>) -> Self {
        Self {
            gateway,
            state: watch::Sender::new(DirectoryState::default()),
            list_generation: AtomicU64::new(0),
            detail_generation: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> DirectoryState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DirectoryState> {
        self.state.subscribe()
    }

    pub async fn fetch_employees(&self, filters: EmployeeFilters) -> FetchOutcome {
        let generation = self.list_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        debug!(generation, ?filters, "fetching employees");

        let result = self.gateway.list_employees(&filters).await;

        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|s| {
            if self.list_generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            s.loading = false;
            match result {
                Ok(employees) => {
                    debug!(generation, count = employees.len(), "employees loaded");
                    s.employees = employees;
                    s.error = None;
                    outcome = FetchOutcome::Applied;
                }
                Err(e) => {
                    warn!(generation, "fetching employees failed: {e}");
                    let msg = e.to_string();
                    s.error = Some(msg.clone());
                    outcome = FetchOutcome::Failed(msg);
                }
            }
            true
        });

        if outcome == FetchOutcome::Superseded {
            debug!(generation, "discarding superseded employee list response");
        }
        outcome
    }

    /// Load the full profile of one employee into `selected_employee`.
    pub async fn fetch_employee(&self, id: EmployeeId) -> FetchOutcome {
        let generation = self.detail_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.detail_loading = true;
            s.detail_error = None;
        });

        let result = self.gateway.get_employee(id).await;

        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|s| {
            if self.detail_generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            s.detail_loading = false;
            match result {
                Ok(detail) => {
                    s.selected_employee = Some(detail);
                    outcome = FetchOutcome::Applied;
                }
                Err(e) => {
                    warn!(employee_id = id, "fetching employee failed: {e}");
                    let msg = e.to_string();
                    s.detail_error = Some(msg.clone());
                    outcome = FetchOutcome::Failed(msg);
                }
            }
            true
        });
        outcome
    }

    pub fn clear_selected_employee(&self) {
        self.state.send_if_modified(|s| {
            let had = s.selected_employee.is_some() || s.detail_error.is_some();
            s.selected_employee = None;
            s.detail_error = None;
            had
        });
    }

    /// Department list for the filter control. Failure is non-fatal: the
    /// previous list (empty on first load) is kept and the error is logged.
    pub async fn fetch_departments(&self) -> GatewayResult<()> {
        match self.gateway.list_departments().await {
            Ok(departments) => {
                self.state.send_modify(|s| s.departments = departments);
                Ok(())
            }
            Err(e) => {
                warn!("failed to fetch departments: {e}");
                Err(e)
            }
        }
    }

    /// Merge `patch` into the active filters and refetch with the result.
    pub async fn set_filters(&self, patch: FilterPatch) -> FetchOutcome {
        let mut merged = EmployeeFilters::default();
        self.state.send_modify(|s| {
            s.filters.merge(patch);
            merged = s.filters.clone();
        });
        self.fetch_employees(merged).await
    }

    pub async fn clear_filters(&self) -> FetchOutcome {
        self.state
            .send_modify(|s| s.filters = EmployeeFilters::default());
        self.fetch_employees(EmployeeFilters::default()).await
    }

    /// Refetch with whatever filters are active.
    pub async fn refresh(&self) -> FetchOutcome {
        let filters = self.state.borrow().filters.clone();
        self.fetch_employees(filters).await
    }
}
