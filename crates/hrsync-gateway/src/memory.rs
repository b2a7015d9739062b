//! In-process backend used by `--demo` mode and by the test suites.
//!
//! Filters are applied "server-side", every call is recorded, failures can be
//! injected per operation, and executing a sync resolves the matching needs so
//! a follow-up check reports the new state.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use hrsync_core::types::{
    Department, DepartmentId, Employee, EmployeeDetail, EmployeeFilters, EmployeeId,
    EmploymentStatus, SyncAction, SyncDetail, SyncNeed, SyncResult, SyncStatus,
    SyncStatusSummary,
};

use crate::{GatewayError, GatewayResult, HrGateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListEmployees,
    GetEmployee,
    ListDepartments,
    CheckSync,
    ExecuteSync,
}

/// A request as received by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    ListEmployees(EmployeeFilters),
    GetEmployee(EmployeeId),
    ListDepartments,
    CheckSync,
    ExecuteSync(Vec<EmployeeId>),
}

impl GatewayCall {
    pub fn operation(&self) -> Operation {
        match self {
            GatewayCall::ListEmployees(_) => Operation::ListEmployees,
            GatewayCall::GetEmployee(_) => Operation::GetEmployee,
            GatewayCall::ListDepartments => Operation::ListDepartments,
            GatewayCall::CheckSync => Operation::CheckSync,
            GatewayCall::ExecuteSync(_) => Operation::ExecuteSync,
        }
    }
}

#[derive(Debug, Clone)]
struct RosterEntry {
    department_id: Option<DepartmentId>,
    employee: Employee,
}

#[derive(Default)]
struct Inner {
    roster: Vec<RosterEntry>,
    departments: Vec<Department>,
    needs: Vec<SyncNeed>,
    calls: Vec<GatewayCall>,
    failures: HashMap<Operation, String>,
}

#[derive(Default)]
pub struct MemoryGateway {
    inner: Mutex<Inner>,
    latency: Option<Duration>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Five employees in three departments, two of them pending sync.
    pub fn demo() -> Self {
        let gw = Self::new()
            .with_department(1, "IT Department")
            .with_department(2, "HR Department")
            .with_department(3, "Accounting");

        let roster = [
            (1, "Nguyen Van An", 1, "Senior Developer", SyncStatus::Synced, (2023, 1, 15)),
            (2, "Tran Thi Binh", 2, "HR Manager", SyncStatus::Synced, (2023, 3, 10)),
            (3, "Le Van Cuong", 1, "Junior Developer", SyncStatus::NeedsSync, (2024, 1, 5)),
            (4, "Pham Thi Dung", 3, "Accountant", SyncStatus::Synced, (2023, 6, 20)),
            (5, "Hoang Van Em", 1, "DevOps Engineer", SyncStatus::NeedsSync, (2024, 2, 1)),
        ];

        let gw = roster.into_iter().fold(gw, |gw, (id, name, dept, pos, status, (y, m, d))| {
            gw.with_employee(id, name, Some(dept), pos, status, NaiveDate::from_ymd_opt(y, m, d))
        });

        gw.with_need(3, SyncAction::Insert, "Employee does not exist in payroll system")
            .with_need(5, SyncAction::Update, "Changed: DepartmentID")
    }

    /// Simulated round-trip delay applied to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_department(self, id: DepartmentId, name: &str) -> Self {
        self.lock().departments.push(Department {
            department_id: id,
            department_name: name.to_string(),
            employee_count: 0,
        });
        self
    }

    pub fn with_employee(
        self,
        id: EmployeeId,
        name: &str,
        department_id: Option<DepartmentId>,
        position: &str,
        sync_status: SyncStatus,
        hire_date: Option<NaiveDate>,
    ) -> Self {
        {
            let mut inner = self.lock();
            let department_name = department_id.and_then(|d| {
                inner
                    .departments
                    .iter()
                    .find(|dept| dept.department_id == d)
                    .map(|dept| dept.department_name.clone())
            });
            if let Some(d) = department_id {
                if let Some(dept) = inner.departments.iter_mut().find(|x| x.department_id == d) {
                    dept.employee_count += 1;
                }
            }
            inner.roster.push(RosterEntry {
                department_id,
                employee: Employee {
                    employee_id: id,
                    full_name: name.to_string(),
                    department_name,
                    position_name: Some(position.to_string()),
                    status: EmploymentStatus::Active,
                    sync_status,
                    hire_date,
                },
            });
        }
        self
    }

    /// Register a pending need for an existing roster entry.
    pub fn with_need(self, id: EmployeeId, action: SyncAction, reason: &str) -> Self {
        {
            let mut inner = self.lock();
            let full_name = inner
                .roster
                .iter()
                .find(|e| e.employee.employee_id == id)
                .map(|e| e.employee.full_name.clone())
                .unwrap_or_else(|| format!("Employee {id}"));
            inner.needs.push(SyncNeed {
                employee_id: id,
                full_name,
                action,
                reason: reason.to_string(),
                hr_data: None,
                payroll_data: None,
            });
        }
        self
    }

    /// Make every subsequent call of `op` fail with `message`.
    pub fn fail(&self, op: Operation, message: &str) {
        self.lock().failures.insert(op, message.to_string());
    }

    pub fn recover(&self, op: Operation) {
        self.lock().failures.remove(&op);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation() == op)
            .count()
    }

    pub fn pending_needs(&self) -> Vec<SyncNeed> {
        self.lock().needs.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-call; the data is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn enter(&self, call: GatewayCall) -> GatewayResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut inner = self.lock();
        let op = call.operation();
        inner.calls.push(call);
        match inner.failures.get(&op) {
            Some(msg) => Err(GatewayError::Unavailable(msg.clone())),
            None => Ok(()),
        }
    }
}

fn matches_filters(entry: &RosterEntry, filters: &EmployeeFilters) -> bool {
    if let Some(d) = filters.department_id {
        if entry.department_id != Some(d) {
            return false;
        }
    }
    let needle = filters.search.trim().to_lowercase();
    needle.is_empty() || entry.employee.full_name.to_lowercase().contains(&needle)
}

#[async_trait]
impl HrGateway for MemoryGateway {
    async fn list_employees(&self, filters: &EmployeeFilters) -> GatewayResult<Vec<Employee>> {
        self.enter(GatewayCall::ListEmployees(filters.clone())).await?;
        Ok(self
            .lock()
            .roster
            .iter()
            .filter(|e| matches_filters(e, filters))
            .map(|e| e.employee.clone())
            .collect())
    }

    async fn get_employee(&self, id: EmployeeId) -> GatewayResult<EmployeeDetail> {
        self.enter(GatewayCall::GetEmployee(id)).await?;
        let inner = self.lock();
        let entry = inner
            .roster
            .iter()
            .find(|e| e.employee.employee_id == id)
            .ok_or_else(|| GatewayError::Status {
                status: 404,
                detail: format!("Employee with ID {id} not found"),
            })?;
        let e = &entry.employee;
        Ok(EmployeeDetail {
            employee_id: e.employee_id,
            full_name: e.full_name.clone(),
            department_id: entry.department_id,
            position_id: None,
            status: e.status.clone(),
            date_of_birth: None,
            gender: None,
            phone_number: None,
            email: None,
            hire_date: e.hire_date,
            department_name: e.department_name.clone(),
            position_name: e.position_name.clone(),
            sync_status: e.sync_status,
            created_at: None,
            updated_at: None,
        })
    }

    async fn list_departments(&self) -> GatewayResult<Vec<Department>> {
        self.enter(GatewayCall::ListDepartments).await?;
        Ok(self.lock().departments.clone())
    }

    async fn check_sync(&self) -> GatewayResult<SyncStatusSummary> {
        self.enter(GatewayCall::CheckSync).await?;
        let inner = self.lock();
        let total = inner.roster.len() as u32;
        let need = inner.needs.len() as u32;
        Ok(SyncStatusSummary {
            total_employees: total,
            need_sync: need,
            already_synced: total.saturating_sub(need),
            sync_needs: inner.needs.clone(),
            checked_at: Some(Utc::now().naive_utc()),
        })
    }

    async fn execute_sync(&self, employee_ids: &[EmployeeId]) -> GatewayResult<SyncResult> {
        self.enter(GatewayCall::ExecuteSync(employee_ids.to_vec())).await?;
        let mut inner = self.lock();
        let mut details = Vec::with_capacity(employee_ids.len());
        let mut synced = 0u32;
        let mut failed = 0u32;

        for &id in employee_ids {
            let Some(pos) = inner.roster.iter().position(|e| e.employee.employee_id == id) else {
                failed += 1;
                details.push(SyncDetail {
                    employee_id: Some(id),
                    action: None,
                    status: "failed".into(),
                    message: format!("Employee {id} does not exist in HR database"),
                });
                continue;
            };

            let action = match inner.needs.iter().position(|n| n.employee_id == id) {
                Some(i) => inner.needs.remove(i).action,
                None => SyncAction::Update,
            };
            let entry = &mut inner.roster[pos];
            entry.employee.sync_status = SyncStatus::Synced;
            synced += 1;
            details.push(SyncDetail {
                employee_id: Some(id),
                action: Some(action),
                status: "success".into(),
                message: format!("Synced {}", entry.employee.full_name),
            });
        }

        Ok(SyncResult {
            success: failed == 0,
            message: format!("Synced {synced}/{} employees", employee_ids.len()),
            synced_count: synced,
            failed_count: failed,
            details,
            synced_at: Some(Utc::now().naive_utc()),
        })
    }
}
