//! Shared world state
//!
//! The inbound task builds each new [`WorldView`] completely before
//! publishing it with a single pointer swap, so readers holding a snapshot
//! never observe a half-applied update.

use std::sync::{Arc, PoisonError, RwLock};

use kriegspiel_core::WorldView;

/// Handle to the latest published world view
#[derive(Clone, Debug, Default)]
pub struct SharedWorld {
    current: Arc<RwLock<Arc<WorldView>>>,
}

impl SharedWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest published view. Cheap: clones an `Arc`, the lock is held
    /// only for the clone.
    pub fn snapshot(&self) -> Arc<WorldView> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Replace the current view
    pub fn publish(&self, view: WorldView) {
        let next = Arc::new(view);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }
}
