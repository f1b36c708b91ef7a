//! Shared application state.

use std::sync::Arc;

use hexrealm_engine::Engine;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The running engine. Commands and queries both go through it.
    pub engine: Arc<Engine>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}
