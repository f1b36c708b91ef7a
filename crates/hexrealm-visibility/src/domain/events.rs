//! Domain events for the Visibility context.

use hexrealm_core::event::{DomainEvent, EventMetadata};
use hexrealm_core::ids::{GameId, PlayerId};
use hexrealm_core::position::Position;
use hexrealm_core::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Event type tag for [`VisibilityUpdated`].
pub const VISIBILITY_UPDATED_EVENT_TYPE: &str = "visibility.visibility_updated";
/// Event type tag for [`VisibilityRevealed`].
pub const VISIBILITY_REVEALED_EVENT_TYPE: &str = "visibility.visibility_revealed";

/// Emitted with the player's complete fog-of-war state after a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityUpdated {
    pub game_id: GameId,
    pub player_id: PlayerId,
    /// Cells currently in sight, sorted.
    pub active: Vec<Position>,
    /// Cells seen before but not in sight now, sorted.
    pub discovered: Vec<Position>,
    pub updated_at: Timestamp,
}

/// Emitted alongside an update when cells are seen for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityRevealed {
    pub game_id: GameId,
    pub player_id: PlayerId,
    /// Newly seen cells, sorted.
    pub revealed: Vec<Position>,
    pub revealed_at: Timestamp,
}

/// Event payload variants for the Visibility context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityEventKind {
    /// Fog-of-war state has changed.
    VisibilityUpdated(VisibilityUpdated),
    /// New cells have come into sight.
    VisibilityRevealed(VisibilityRevealed),
}

impl VisibilityEventKind {
    /// Routing tag of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::VisibilityUpdated(_) => VISIBILITY_UPDATED_EVENT_TYPE,
            Self::VisibilityRevealed(_) => VISIBILITY_REVEALED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Visibility context.
#[derive(Debug, Clone)]
pub struct VisibilityEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: VisibilityEventKind,
}

impl DomainEvent for VisibilityEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("VisibilityEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
