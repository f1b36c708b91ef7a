//! Commands for the City context.

use hexrealm_core::command::Command;
use hexrealm_core::ids::{CityId, GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;
use hexrealm_core::terrain::Terrain;
use hexrealm_core::timestamp::Timestamp;
use uuid::Uuid;

/// Command to found a city with one of the owner's units.
///
/// The terrain at `position`, the positions of existing cities and the
/// owner of the founding unit are read-side facts the caller resolves
/// before dispatch.
#[derive(Debug, Clone)]
pub struct FoundCity {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The city identifier.
    pub city_id: CityId,
    /// Owning player.
    pub owner_id: PlayerId,
    /// Game the city belongs to.
    pub game_id: GameId,
    /// Unit founding the city.
    pub unit_id: UnitId,
    /// Owner of `unit_id` if it is a living unit of this game.
    pub founding_unit_owner: Option<PlayerId>,
    /// City name.
    pub name: String,
    /// Requested location.
    pub position: Position,
    /// Terrain at `position`.
    pub terrain: Terrain,
    /// Positions of the game's existing cities.
    pub existing_city_positions: Vec<Position>,
    /// Caller-set founding time.
    pub founded_at: Timestamp,
}

impl Command for FoundCity {
    fn command_type(&self) -> &'static str {
        "city.found_city"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn target_stream(&self) -> Uuid {
        self.city_id.as_uuid()
    }
}
