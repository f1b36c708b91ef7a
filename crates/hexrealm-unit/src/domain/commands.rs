//! Commands for the Unit context.

use hexrealm_core::command::Command;
use hexrealm_core::ids::{GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;
use hexrealm_core::timestamp::Timestamp;
use hexrealm_core::unit_type::UnitType;
use uuid::Uuid;

/// Command to create a unit. Idempotent per unit id.
#[derive(Debug, Clone)]
pub struct CreateUnit {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
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
    /// Caller-set creation time.
    pub created_at: Timestamp,
}

/// Command to move a unit.
#[derive(Debug, Clone)]
pub struct MoveUnit {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The unit identifier.
    pub unit_id: UnitId,
    /// Destination.
    pub to: Position,
    /// Positions of the other living units in the game.
    pub occupied_positions: Vec<Position>,
    /// Caller-set time.
    pub moved_at: Timestamp,
}

/// Command for one unit to strike another. Written to the target's stream.
#[derive(Debug, Clone)]
pub struct AttackUnit {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The attacking unit.
    pub attacker_id: UnitId,
    /// The attacked unit.
    pub target_id: UnitId,
    /// Caller-set time.
    pub attacked_at: Timestamp,
}

/// Command to remove a unit from play. Destroying a dead unit does nothing.
#[derive(Debug, Clone)]
pub struct DestroyUnit {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The unit identifier.
    pub unit_id: UnitId,
    /// Caller-set time.
    pub destroyed_at: Timestamp,
}

impl Command for CreateUnit {
    fn command_type(&self) -> &'static str {
        "unit.create_unit"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn target_stream(&self) -> Uuid {
        self.unit_id.as_uuid()
    }
}

impl Command for MoveUnit {
    fn command_type(&self) -> &'static str {
        "unit.move_unit"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn target_stream(&self) -> Uuid {
        self.unit_id.as_uuid()
    }
}

impl Command for AttackUnit {
    fn command_type(&self) -> &'static str {
        "unit.attack_unit"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn target_stream(&self) -> Uuid {
        self.target_id.as_uuid()
    }
}

impl Command for DestroyUnit {
    fn command_type(&self) -> &'static str {
        "unit.destroy_unit"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn target_stream(&self) -> Uuid {
        self.unit_id.as_uuid()
    }
}
