//! Domain events for the Technology context.

use hexrealm_core::event::{DomainEvent, EventMetadata};
use hexrealm_core::ids::{GameId, PlayerId, TechnologyId};
use hexrealm_core::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Event type tag for [`TechnologyTreeWasCreated`].
pub const TECHNOLOGY_TREE_CREATED_EVENT_TYPE: &str = "technology.tree_created";
/// Event type tag for [`SciencePointsWereGranted`].
pub const SCIENCE_POINTS_GRANTED_EVENT_TYPE: &str = "technology.science_points_granted";
/// Event type tag for [`TechnologyWasDiscovered`].
pub const TECHNOLOGY_DISCOVERED_EVENT_TYPE: &str = "technology.technology_discovered";

/// Emitted when a player's research tree is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyTreeWasCreated {
    /// Owning player.
    pub player_id: PlayerId,
    /// Game the player is seated in.
    pub game_id: GameId,
    /// Starting balance.
    pub initial_science_points: u32,
    /// Caller-set creation time.
    pub created_at: Timestamp,
}

/// Emitted when science points are credited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SciencePointsWereGranted {
    pub player_id: PlayerId,
    pub amount: u32,
    pub granted_at: Timestamp,
}

/// Emitted when a technology is researched. The cost is debited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyWasDiscovered {
    /// Researching player.
    pub player_id: PlayerId,
    /// Technology discovered.
    pub technology_id: TechnologyId,
    /// Science points spent.
    pub cost: u32,
    /// Caller-set time.
    pub discovered_at: Timestamp,
}

/// Event payload variants for the Technology context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TechnologyEventKind {
    /// A research tree has been created.
    TechnologyTreeWasCreated(TechnologyTreeWasCreated),
    /// Science points have been granted.
    SciencePointsWereGranted(SciencePointsWereGranted),
    /// A technology has been discovered.
    TechnologyWasDiscovered(TechnologyWasDiscovered),
}

impl TechnologyEventKind {
    /// Routing tag of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TechnologyTreeWasCreated(_) => TECHNOLOGY_TREE_CREATED_EVENT_TYPE,
            Self::SciencePointsWereGranted(_) => SCIENCE_POINTS_GRANTED_EVENT_TYPE,
            Self::TechnologyWasDiscovered(_) => TECHNOLOGY_DISCOVERED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Technology context.
#[derive(Debug, Clone)]
pub struct TechnologyEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: TechnologyEventKind,
}

impl DomainEvent for TechnologyEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("TechnologyEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
