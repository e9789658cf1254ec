//! lazy
//!
//! Lazily constructed, shared per-owner companion objects.
//!
//! # Design
//!
//! Some entities carry an expensive companion (a webhook's managers, a
//! session's client view) that should only be built when first asked for,
//! and then shared by every caller for the rest of the owner's life.
//!
//! [`LazyShared`] is a one-way `Uninitialized -> Initialized` cell built on
//! [`OnceLock`]. The steady-state read is a single atomic load. Concurrent
//! first callers block on the cell while exactly one of them runs the
//! constructor; all of them then observe the same `Arc`. There is no reset.
//!
//! # Example
//!
//! ```
//! use cordkit::lazy::LazyShared;
//! use std::sync::Arc;
//!
//! let cell: LazyShared<String> = LazyShared::new();
//! let a = cell.get_or_init(|| "manager".to_string());
//! let b = cell.get_or_init(|| unreachable!());
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

/// A shared value created on first demand.
pub struct LazyShared<T> {
    cell: OnceLock<Arc<T>>,
}

impl<T> LazyShared<T> {
    /// Create an empty cell.
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the shared instance, constructing it with `init` if needed.
    ///
    /// `init` runs at most once per cell even under concurrent first access.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> Arc<T> {
        Arc::clone(self.cell.get_or_init(|| Arc::new(init())))
    }

    /// Return the instance if it has already been constructed.
    pub fn get(&self) -> Option<Arc<T>> {
        self.cell.get().cloned()
    }

    /// Whether the instance has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for LazyShared<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for LazyShared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyShared")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
