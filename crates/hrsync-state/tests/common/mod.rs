//! Gateway whose responses are released by the test, to force completion order.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use hrsync_core::types::{
    Department, Employee, EmployeeDetail, EmployeeFilters, EmployeeId, EmploymentStatus,
    SyncResult, SyncStatus, SyncStatusSummary,
};
use hrsync_gateway::{GatewayError, GatewayResult, HrGateway};

#[derive(Default)]
pub struct GatedGateway {
    list_gates: Mutex<VecDeque<oneshot::Receiver<Vec<Employee>>>>,
    check_gates: Mutex<VecDeque<oneshot::Receiver<SyncStatusSummary>>>,
    pub list_calls: AtomicUsize,
    pub check_calls: AtomicUsize,
    pub execute_calls: AtomicUsize,
}

impl GatedGateway {
    pub fn gate_list(&self) -> oneshot::Sender<Vec<Employee>> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn gate_check(&self) -> oneshot::Sender<SyncStatusSummary> {
        let (tx, rx) = oneshot::channel();
        self.check_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub fn employee(id: EmployeeId, name: &str) -> Employee {
    Employee {
        employee_id: id,
        full_name: name.to_string(),
        department_name: None,
        position_name: None,
        status: EmploymentStatus::Active,
        sync_status: SyncStatus::Synced,
        hire_date: None,
    }
}

#[async_trait]
impl HrGateway for GatedGateway {
    async fn list_employees(&self, _filters: &EmployeeFilters) -> GatewayResult<Vec<Employee>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.list_gates.lock().unwrap().pop_front();
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| GatewayError::Unavailable("gate dropped".into())),
            None => Err(GatewayError::Unavailable("no gate".into())),
        }
    }

    async fn get_employee(&self, _id: EmployeeId) -> GatewayResult<EmployeeDetail> {
        Err(GatewayError::Unavailable("not gated".into()))
    }

    async fn list_departments(&self) -> GatewayResult<Vec<Department>> {
        Ok(Vec::new())
    }

    async fn check_sync(&self) -> GatewayResult<SyncStatusSummary> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.check_gates.lock().unwrap().pop_front();
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| GatewayError::Unavailable("gate dropped".into())),
            None => Err(GatewayError::Unavailable("no gate".into())),
        }
    }

    async fn execute_sync(&self, _employee_ids: &[EmployeeId]) -> GatewayResult<SyncResult> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        Err(GatewayError::Unavailable("not gated".into()))
    }
}
