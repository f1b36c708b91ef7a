//! Query handlers for the Unit context.

use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;

use crate::application::projections::{UnitProjection, UnitView};

/// Retrieves a unit by id.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the unit is not projected.
pub fn get_unit_view(units: &UnitProjection, unit_id: UnitId) -> Result<UnitView, DomainError> {
    units
        .get(unit_id)
        .ok_or(DomainError::AggregateNotFound(unit_id.as_uuid()))
}

/// Units of a game, dead ones included.
#[must_use]
pub fn get_units_by_game(units: &UnitProjection, game_id: GameId) -> Vec<UnitView> {
    units.by_game(game_id)
}

#[must_use]
pub fn get_units_by_player(units: &UnitProjection, owner_id: PlayerId) -> Vec<UnitView> {
    units.by_player(owner_id)
}

/// Cells held by living units of a game other than `moving`, as needed
/// by `MoveUnit`.
#[must_use]
pub fn get_occupied_positions(
    units: &UnitProjection,
    game_id: GameId,
    moving: Option<UnitId>,
) -> Vec<Position> {
    units.occupied_positions(game_id, moving)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unit_view_not_found() {
        let units = UnitProjection::new();
        let unit_id = UnitId::generate();

        let result = get_unit_view(&units, unit_id);

        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, unit_id.as_uuid()),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
        assert!(get_units_by_game(&units, GameId::generate()).is_empty());
    }
}
