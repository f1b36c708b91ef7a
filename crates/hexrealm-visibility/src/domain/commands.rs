//! Commands for the Visibility context.

use hexrealm_core::command::Command;
use hexrealm_core::ids::{GameId, PlayerId};
use hexrealm_core::position::Position;
use hexrealm_core::timestamp::Timestamp;
use hexrealm_core::unit_type::UnitType;
use uuid::Uuid;

use super::aggregates::PlayerVisibility;

/// A living unit that gives sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSight {
    pub position: Position,
    pub unit_type: UnitType,
}

/// A city that gives sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitySight {
    pub position: Position,
    pub level: u32,
}

/// Command to recompute a player's fog of war from everything they own.
#[derive(Debug, Clone)]
pub struct UpdateVisibility {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub game_id: GameId,
    pub player_id: PlayerId,
    /// Every living unit of the player.
    pub units: Vec<UnitSight>,
    /// Every city of the player.
    pub cities: Vec<CitySight>,
    pub updated_at: Timestamp,
}

impl Command for UpdateVisibility {
    fn command_type(&self) -> &'static str {
        "visibility.update_visibility"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn target_stream(&self) -> Uuid {
        PlayerVisibility::stream_id(self.game_id, self.player_id)
    }
}
