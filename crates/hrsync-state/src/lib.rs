//! hrsync-state: explicit, per-instance state containers for the dashboard.
//!
//! Each container keeps its snapshot in a `tokio::sync::watch` channel:
//! commands mutate it atomically, views read `snapshot()` or hold a
//! `subscribe()` receiver to be woken on every transition.

pub mod debounce;
pub mod directory;
pub mod error;
pub mod selection;
pub mod sync_center;
pub mod workflow;

pub use debounce::SearchDebouncer;
pub use directory::{DirectoryState, EmployeeDirectory, FetchOutcome};
pub use error::SyncError;
pub use selection::Selection;
pub use sync_center::{SyncCenter, SyncCenterState};
pub use workflow::{CheckOutcome, SyncPhase, SyncWorkflow, WorkflowState};
