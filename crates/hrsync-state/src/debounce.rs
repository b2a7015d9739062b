//! Debounced search input for the directory view.
//!
//! Every keystroke cancels the pending timer and starts a new one; only input
//! that stays unchanged for the full delay is committed to the filters.
//! Cancellation covers the timer only: once the fetch has been issued it runs
//! to completion so the directory's busy flag is always cleared.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use hrsync_core::types::FilterPatch;

use crate::directory::EmployeeDirectory;

pub struct SearchDebouncer {
    directory: Arc<EmployeeDirectory>,
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl SearchDebouncer {
    pub fn new(directory: Arc<EmployeeDirectory>, delay: Duration) -> Self {
        Self {
            directory,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Record new search text. Must be called inside a tokio runtime.
    pub fn input(&self, text: impl Into<String>) {
        let text = text.into();
        let token = CancellationToken::new();
        if let Some(previous) = self.slot().replace(token.clone()) {
            previous.cancel();
        }

        let directory = Arc::clone(&self.directory);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            token.cancel();
            debug!(search = %text, "committing debounced search");
            directory.set_filters(FilterPatch::search(text)).await;
        });
    }

    /// Drop any pending input without committing it.
    pub fn cancel(&self) {
        if let Some(token) = self.slot().take() {
            token.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|t| !t.is_cancelled())
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
