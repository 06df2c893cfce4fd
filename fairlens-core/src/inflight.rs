//! Counted in-flight request tracking for the loading overlay.
//!
//! Each request holds an `InFlightGuard`; dropping it ends the request. The
//! overlay is visible while any guard is alive, so overlapping requests never
//! hide it early.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    next_id: AtomicU64,
    active: Mutex<Vec<(u64, String)>>,
}

/// Shared, cloneable tracker. Clones observe the same set of requests.
#[derive(Debug, Clone, Default)]
pub struct InFlightTracker {
    inner: Arc<Inner>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request labelled for the overlay.
    pub fn begin(&self, label: impl Into<String>) -> InFlightGuard {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let label = label.into();
        tracing::trace!(id, label = %label, "Request started");
        self.lock().push((id, label));
        InFlightGuard {
            inner: Arc::clone(&self.inner),
            id,
        }
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_busy(&self) -> bool {
        self.count() > 0
    }

    /// Label of the most recently started request still in flight.
    pub fn current_label(&self) -> Option<String> {
        self.lock().last().map(|(_, label)| label.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, String)>> {
        // Pushes and retains never leave the Vec half-updated.
        self.inner
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Ends its request when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    inner: Arc<Inner>,
    id: u64,
}

impl InFlightGuard {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut active = self
            .inner
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        active.retain(|(id, _)| *id != self.id);
        tracing::trace!(id = self.id, remaining = active.len(), "Request finished");
    }
}
