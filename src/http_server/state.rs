//! Shared request state

use std::time::Instant;

use crate::store::StoreHandle;

/// State shared across handlers.
///
/// Holds no mutable request data; the store handle is the only shared
/// resource.
pub struct AppState {
    pub store: StoreHandle,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created.
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(StoreHandle::disconnected())
    }
}
