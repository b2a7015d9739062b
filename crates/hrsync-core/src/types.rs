//! Wire types shared between the gateway, the state containers, and the views.
//!
//! Field names follow the backend verbatim (PascalCase, `EmployeeID`, `HRData`),
//! so every struct carries serde renames rather than a mapping layer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

pub type EmployeeId = i64;
pub type DepartmentId = i64;

/// Per-employee reconciliation state between HR and Payroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Synced,
    NeedsSync,
    Syncing,
    /// Also used for any status string the client does not recognise
    #[serde(other)]
    Error,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "synced",
            SyncStatus::NeedsSync => "needs_sync",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Error => "error",
        }
    }
}

/// Employment status. The backend only distinguishes `Active`; every other
/// value is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmploymentStatus {
    Active,
    Other(String),
}

impl EmploymentStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, EmploymentStatus::Active)
    }

    pub fn as_str(&self) -> &str {
        match self {
            EmploymentStatus::Active => "Active",
            EmploymentStatus::Other(s) => s,
        }
    }
}

impl From<String> for EmploymentStatus {
    fn from(s: String) -> Self {
        if s == "Active" {
            EmploymentStatus::Active
        } else {
            EmploymentStatus::Other(s)
        }
    }
}

impl From<EmploymentStatus> for String {
    fn from(s: EmploymentStatus) -> Self {
        match s {
            EmploymentStatus::Active => "Active".to_string(),
            EmploymentStatus::Other(s) => s,
        }
    }
}

/// Row of the employee list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Employee {
    #[serde(rename = "EmployeeID")]
    pub employee_id: EmployeeId,
    pub full_name: String,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub position_name: Option<String>,
    pub status: EmploymentStatus,
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
}

impl Employee {
    pub fn department_label(&self) -> &str {
        self.department_name.as_deref().unwrap_or("Unassigned")
    }

    pub fn position_label(&self) -> &str {
        self.position_name.as_deref().unwrap_or("Unspecified")
    }
}

fn default_employment_status() -> EmploymentStatus {
    EmploymentStatus::Active
}

fn default_detail_sync_status() -> SyncStatus {
    SyncStatus::NeedsSync
}

/// Unified HR + Payroll profile of a single employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmployeeDetail {
    #[serde(rename = "EmployeeID")]
    pub employee_id: EmployeeId,
    pub full_name: String,
    #[serde(rename = "DepartmentID", default)]
    pub department_id: Option<DepartmentId>,
    #[serde(rename = "PositionID", default)]
    pub position_id: Option<i64>,
    #[serde(default = "default_employment_status")]
    pub status: EmploymentStatus,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub position_name: Option<String>,
    #[serde(default = "default_detail_sync_status")]
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Department {
    #[serde(rename = "DepartmentID")]
    pub department_id: DepartmentId,
    pub department_name: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub employee_count: u32,
}

fn null_as_zero<'de, D>(d: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(d)?.unwrap_or(0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncAction {
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "NONE")]
    NoAction,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Insert => "INSERT",
            SyncAction::Update => "UPDATE",
            SyncAction::NoAction => "NONE",
        }
    }
}

/// One employee whose HR and Payroll records differ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SyncNeed {
    #[serde(rename = "EmployeeID")]
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub action: SyncAction,
    pub reason: String,
    #[serde(rename = "HRData", default, skip_serializing_if = "Option::is_none")]
    pub hr_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payroll_data: Option<serde_json::Value>,
}

/// Response of a sync check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SyncStatusSummary {
    pub total_employees: u32,
    pub need_sync: u32,
    pub already_synced: u32,
    pub sync_needs: Vec<SyncNeed>,
    #[serde(default)]
    pub checked_at: Option<NaiveDateTime>,
}

impl SyncStatusSummary {
    /// `NeedSync + AlreadySynced == TotalEmployees`. Reported by the backend,
    /// never enforced here.
    pub fn is_consistent(&self) -> bool {
        u64::from(self.need_sync) + u64::from(self.already_synced)
            == u64::from(self.total_employees)
    }

    pub fn need_ratio(&self) -> f64 {
        ratio(self.need_sync, self.total_employees)
    }

    pub fn synced_ratio(&self) -> f64 {
        ratio(self.already_synced, self.total_employees)
    }
}

fn ratio(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        (f64::from(part) / f64::from(total)).clamp(0.0, 1.0)
    }
}

/// Per-employee line of an execute response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SyncDetail {
    #[serde(rename = "EmployeeID", default)]
    pub employee_id: Option<EmployeeId>,
    #[serde(default)]
    pub action: Option<SyncAction>,
    pub status: String,
    pub message: String,
}

/// Response of a sync execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SyncResult {
    pub success: bool,
    pub message: String,
    pub synced_count: u32,
    pub failed_count: u32,
    #[serde(default)]
    pub details: Vec<SyncDetail>,
    #[serde(default)]
    pub synced_at: Option<NaiveDateTime>,
}

impl SyncResult {
    /// Partial failure is data, not an error: `success` may still be true.
    pub fn has_failures(&self) -> bool {
        self.failed_count > 0
    }
}

/// Body of `POST /hr/sync/execute`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncExecuteRequest {
    #[serde(rename = "EmployeeIDs")]
    pub employee_ids: Vec<EmployeeId>,
}

/// Active directory filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFilters {
    pub department_id: Option<DepartmentId>,
    pub search: String,
}

impl EmployeeFilters {
    pub fn is_empty(&self) -> bool {
        self.department_id.is_none() && self.search.trim().is_empty()
    }

    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(dept) = patch.department_id {
            self.department_id = dept;
        }
        if let Some(search) = patch.search {
            self.search = search;
        }
    }

    /// Query parameters for the list endpoint; empty filters are omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut q = Vec::new();
        if let Some(id) = self.department_id {
            q.push(("department_id", id.to_string()));
        }
        if !self.search.trim().is_empty() {
            q.push(("search", self.search.clone()));
        }
        q
    }
}

/// Partial filter change. `department_id: Some(None)` clears the department.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub department_id: Option<Option<DepartmentId>>,
    pub search: Option<String>,
}

impl FilterPatch {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn department(id: Option<DepartmentId>) -> Self {
        Self {
            department_id: Some(id),
            ..Default::default()
        }
    }
}
