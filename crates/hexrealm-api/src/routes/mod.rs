//! Route modules organized by bounded context.

pub mod cities;
pub mod diplomacy;
pub mod games;
pub mod health;
pub mod technology;
pub mod units;
pub mod visibility;

use axum::Router;
use hexrealm_core::repository::StoredEvent;
use serde::Serialize;
use uuid::Uuid;

use crate::state::AppState;

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// Stream the command was written to.
    pub aggregate_id: Uuid,
    /// IDs of the domain events produced and persisted. Empty when the
    /// command changed nothing.
    pub event_ids: Vec<Uuid>,
}

impl CommandResponse {
    #[must_use]
    pub fn new(aggregate_id: Uuid, events: &[StoredEvent]) -> Self {
        Self {
            aggregate_id,
            event_ids: events.iter().map(|e| e.event_id).collect(),
        }
    }
}

/// Every route of the service, without state.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/games", games::router())
        .nest("/api/v1/cities", cities::router())
        .nest("/api/v1/units", units::router())
        .nest("/api/v1/technology", technology::router())
        .nest("/api/v1/diplomacy", diplomacy::router())
        .nest("/api/v1/visibility", visibility::router())
}
