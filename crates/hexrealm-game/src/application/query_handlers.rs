//! Query handlers for the Game context.
//!
//! Queries read projections only. A view that has not yet seen its
//! creating event answers `AggregateNotFound` instead of waiting.

use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{GameId, PlayerId, UserId};
use hexrealm_core::position::Position;
use hexrealm_core::terrain::Terrain;

use crate::application::projections::{
    GameProjection, GameView, MapProjection, MapView, PlayerProjection, PlayerView,
};
use crate::domain::map::MapTile;

/// Retrieves a game by id.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the game is not projected.
pub fn get_game_view(games: &GameProjection, game_id: GameId) -> Result<GameView, DomainError> {
    games
        .get(game_id)
        .ok_or(DomainError::AggregateNotFound(game_id.as_uuid()))
}

/// Games the user holds a seat in.
#[must_use]
pub fn get_user_games(games: &GameProjection, user_id: UserId) -> Vec<GameView> {
    games.by_user(user_id)
}

/// Every projected game.
#[must_use]
pub fn get_all_games(games: &GameProjection) -> Vec<GameView> {
    games.all()
}

/// Retrieves a player record by id.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the player is not projected.
pub fn get_player_view(
    players: &PlayerProjection,
    player_id: PlayerId,
) -> Result<PlayerView, DomainError> {
    players
        .get(player_id)
        .ok_or(DomainError::AggregateNotFound(player_id.as_uuid()))
}

/// Retrieves the map of a game.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no map has been projected.
pub fn get_map_view(maps: &MapProjection, game_id: GameId) -> Result<MapView, DomainError> {
    maps.get(game_id)
        .ok_or(DomainError::AggregateNotFound(game_id.as_uuid()))
}

/// Retrieves the tiles of a game's map.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no map has been projected.
pub fn get_map_tiles(maps: &MapProjection, game_id: GameId) -> Result<Vec<MapTile>, DomainError> {
    get_map_view(maps, game_id).map(|m| m.tiles)
}

/// Terrain at a position of a game's map.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the game has no map, and
/// `DomainError::Validation` if the position is off the map.
pub fn terrain_at(
    maps: &MapProjection,
    game_id: GameId,
    position: Position,
) -> Result<Terrain, DomainError> {
    let map = get_map_view(maps, game_id)?;
    map.terrain_at(position).ok_or_else(|| {
        DomainError::Validation(format!(
            "position {position} is outside the {}x{} map",
            map.width, map.height
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{GAME_CREATED_EVENT_TYPE, GameEventKind, GameWasCreated};
    use hexrealm_core::projection::Projection;
    use hexrealm_core::timestamp::Timestamp;
    use hexrealm_test_support::{fixed_now, position, stored_event};

    #[test]
    fn test_get_game_view_returns_not_found_before_projection_catches_up() {
        // Arrange
        let games = GameProjection::new();
        let game_id = GameId::generate();

        // Act
        let result = get_game_view(&games, game_id);

        // Assert
        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, game_id.as_uuid()),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_get_game_view_returns_projected_game() {
        // Arrange
        let games = GameProjection::new();
        let game_id = GameId::generate();
        let player_id = PlayerId::generate();
        let created = GameEventKind::GameWasCreated(GameWasCreated {
            game_id,
            name: "Test Game".to_owned(),
            player_id,
            user_id: UserId::generate(),
            created_at: Timestamp::from(fixed_now()),
        });
        games
            .apply(&stored_event(game_id.as_uuid(), 1, GAME_CREATED_EVENT_TYPE, &created))
            .unwrap();

        // Act
        let view = get_game_view(&games, game_id).unwrap();

        // Assert
        assert_eq!(view.name, "Test Game");
        assert_eq!(view.players[0].player_id, player_id);
        assert_eq!(view.current_turn, 0);
    }

    #[test]
    fn test_terrain_at_without_map_is_not_found() {
        let maps = MapProjection::new();

        let result = terrain_at(&maps, GameId::generate(), position(0, 0));

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }
}
