//! Shared store handle
//!
//! Owned by the composition root and cloned into request state. Starts
//! disconnected, is connected at most once, and is never torn down.

use std::sync::{Arc, OnceLock};

use super::collection::ApplicationStore;
use super::errors::{StoreError, StoreResult};

#[derive(Clone, Default)]
pub struct StoreHandle {
    slot: Arc<OnceLock<Arc<ApplicationStore>>>,
}

impl StoreHandle {
    /// A handle with no store behind it yet.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// A handle that is connected from the start.
    pub fn connected(store: ApplicationStore) -> Self {
        let handle = Self::default();
        handle.install(store);
        handle
    }

    /// Connects the handle. Returns `false` if it was already connected, in
    /// which case `store` is dropped.
    pub fn install(&self, store: ApplicationStore) -> bool {
        self.slot.set(Arc::new(store)).is_ok()
    }

    pub fn is_connected(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Returns the connected store.
    pub fn get(&self) -> StoreResult<Arc<ApplicationStore>> {
        self.slot.get().cloned().ok_or(StoreError::NotConnected)
    }
}
