//! hrsync-gateway: the four-plus-one operations the dashboard needs from the
//! HR/Payroll backend, behind one object-safe trait.

pub mod error;
pub mod http;
pub mod memory;

use async_trait::async_trait;
use hrsync_core::types::{
    Department, Employee, EmployeeDetail, EmployeeFilters, EmployeeId, SyncResult,
    SyncStatusSummary,
};

pub use error::{GatewayError, GatewayResult};
pub use http::HttpGateway;
pub use memory::MemoryGateway;

/// Remote data contract consumed by the state containers
#[async_trait]
pub trait HrGateway: Send + Sync {
    async fn list_employees(&self, filters: &EmployeeFilters) -> GatewayResult<Vec<Employee>>;

    async fn get_employee(&self, id: EmployeeId) -> GatewayResult<EmployeeDetail>;

    async fn list_departments(&self) -> GatewayResult<Vec<Department>>;

    async fn check_sync(&self) -> GatewayResult<SyncStatusSummary>;

    async fn execute_sync(&self, employee_ids: &[EmployeeId]) -> GatewayResult<SyncResult>;
}
