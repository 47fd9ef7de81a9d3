//! Process-wide shared container.
//!
//! Hosts that bootstrap once per process (the common case) can share a single
//! container between the bootstrapper and the rest of the application without
//! threading it through every call site.

use super::Container;
use std::sync::{Arc, Mutex, PoisonError};

static SHARED: Mutex<Option<Arc<Container>>> = Mutex::new(None);

/// Returns the process-wide container, creating it on first access.
///
/// Access is serialized behind a lock; concurrent callers racing first access
/// observe the same container.
pub fn global() -> Arc<Container> {
    let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
    slot.get_or_insert_with(|| Arc::new(Container::new()))
        .clone()
}

/// Replaces the process-wide container.
///
/// Existing `Arc` handles obtained from [`global`] keep pointing at the old
/// container.
pub fn set_global(container: Arc<Container>) {
    let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(container);
}
