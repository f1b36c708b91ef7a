//! Query handlers for the Visibility context.

use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{GameId, PlayerId};

use crate::application::projections::{PlayerVisibilityView, VisibilityProjection};
use crate::domain::aggregates::PlayerVisibility;

/// Retrieves one player's fog of war in a game.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` with the visibility stream id
/// if the player has no projected visibility yet.
pub fn get_player_visibility(
    visibility: &VisibilityProjection,
    game_id: GameId,
    player_id: PlayerId,
) -> Result<PlayerVisibilityView, DomainError> {
    visibility
        .get(game_id, player_id)
        .ok_or_else(|| DomainError::AggregateNotFound(PlayerVisibility::stream_id(game_id, player_id)))
}

/// Fog of war of every player of a game.
#[must_use]
pub fn get_game_visibility(
    visibility: &VisibilityProjection,
    game_id: GameId,
) -> Vec<PlayerVisibilityView> {
    visibility.by_game(game_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_player_visibility_not_found() {
        let visibility = VisibilityProjection::new();

        let result = get_player_visibility(&visibility, GameId::generate(), PlayerId::generate());

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }
}
