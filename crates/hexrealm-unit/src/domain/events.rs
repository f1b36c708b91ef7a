//! Domain events for the Unit context.

use hexrealm_core::event::{DomainEvent, EventMetadata};
use hexrealm_core::health::Health;
use hexrealm_core::ids::{GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;
use hexrealm_core::timestamp::Timestamp;
use hexrealm_core::unit_type::UnitType;
use serde::{Deserialize, Serialize};

/// Event type tag for [`UnitWasCreated`].
pub const UNIT_CREATED_EVENT_TYPE: &str = "unit.unit_created";
/// Event type tag for [`UnitWasMoved`].
pub const UNIT_MOVED_EVENT_TYPE: &str = "unit.unit_moved";
/// Event type tag for [`UnitWasAttacked`].
pub const UNIT_ATTACKED_EVENT_TYPE: &str = "unit.unit_attacked";
/// Event type tag for [`UnitWasDestroyed`].
pub const UNIT_DESTROYED_EVENT_TYPE: &str = "unit.unit_destroyed";

/// Emitted when a unit is created at full health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitWasCreated {
    /// The unit identifier.
    pub unit_id: UnitId,
    /// Owning player.
    pub owner_id: PlayerId,
    /// Game the unit belongs to.
    pub game_id: GameId,
    /// Unit type.
    pub unit_type: UnitType,
    /// Starting position.
    pub position: Position,
    /// Starting health.
    pub health: Health,
    /// Caller-set creation time.
    pub created_at: Timestamp,
}

/// Emitted when a unit moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitWasMoved {
    /// The unit identifier.
    pub unit_id: UnitId,
    /// Owning player.
    pub owner_id: PlayerId,
    /// Game the unit belongs to.
    pub game_id: GameId,
    /// Previous position.
    pub from: Position,
    /// New position.
    pub to: Position,
    /// Caller-set time.
    pub moved_at: Timestamp,
}

/// Emitted on the target's stream when it is struck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitWasAttacked {
    /// The attacked unit.
    pub unit_id: UnitId,
    /// The attacking unit.
    pub attacker_id: UnitId,
    /// Hit points removed.
    pub damage: u32,
    /// Hit points left.
    pub remaining_health: u32,
    /// `true` if the strike was lethal.
    pub was_destroyed: bool,
    /// Caller-set time.
    pub attacked_at: Timestamp,
}

/// Emitted when a unit is removed from play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitWasDestroyed {
    /// The unit identifier.
    pub unit_id: UnitId,
    /// Owning player.
    pub owner_id: PlayerId,
    /// Game the unit belonged to.
    pub game_id: GameId,
    /// Caller-set time.
    pub destroyed_at: Timestamp,
}

/// Event payload variants for the Unit context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitEventKind {
    /// A unit has been created.
    UnitWasCreated(UnitWasCreated),
    /// A unit has moved.
    UnitWasMoved(UnitWasMoved),
    /// A unit has been attacked.
    UnitWasAttacked(UnitWasAttacked),
    /// A unit has been destroyed.
    UnitWasDestroyed(UnitWasDestroyed),
}

impl UnitEventKind {
    /// Routing tag of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UnitWasCreated(_) => UNIT_CREATED_EVENT_TYPE,
            Self::UnitWasMoved(_) => UNIT_MOVED_EVENT_TYPE,
            Self::UnitWasAttacked(_) => UNIT_ATTACKED_EVENT_TYPE,
            Self::UnitWasDestroyed(_) => UNIT_DESTROYED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Unit context.
#[derive(Debug, Clone)]
pub struct UnitEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: UnitEventKind,
}

impl DomainEvent for UnitEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("UnitEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
