use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared "work in progress" indicator.
///
/// Each in-flight request holds a [`LoadingGuard`]; the indicator is shown
/// while at least one guard is alive. Clones observe the same counter.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    active: Arc<AtomicUsize>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a request as started. The request ends when the guard drops,
    /// on success, error or early return alike.
    #[must_use = "the indicator is released as soon as the guard is dropped"]
    pub fn acquire(&self) -> LoadingGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            active: Arc::clone(&self.active),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct LoadingGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
