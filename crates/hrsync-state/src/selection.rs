use std::collections::BTreeSet;

use hrsync_core::types::{EmployeeId, SyncNeed};

/// Employees the operator has ticked on the sync view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<EmployeeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: EmployeeId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Replace the selection with every id in `needs` as it is right now.
    pub fn select_all(&mut self, needs: &[SyncNeed]) {
        self.ids = needs.iter().map(|n| n.employee_id).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ascending ids, the order they are sent to the backend in.
    pub fn ids(&self) -> Vec<EmployeeId> {
        self.ids.iter().copied().collect()
    }

    /// Header checkbox state: every need is selected and there is at least one.
    pub fn is_all_selected(&self, needs: &[SyncNeed]) -> bool {
        !needs.is_empty()
            && self.ids.len() == needs.len()
            && needs.iter().all(|n| self.ids.contains(&n.employee_id))
    }
}
