//! Query handlers for the City context.

use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{CityId, GameId, PlayerId};
use hexrealm_core::position::Position;

use crate::application::projections::{CityProjection, CityView};

/// Retrieves a city by id.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the city is not projected.
pub fn get_city_view(cities: &CityProjection, city_id: CityId) -> Result<CityView, DomainError> {
    cities
        .get(city_id)
        .ok_or(DomainError::AggregateNotFound(city_id.as_uuid()))
}

/// Cities of a game, oldest first.
#[must_use]
pub fn get_cities_by_game(cities: &CityProjection, game_id: GameId) -> Vec<CityView> {
    cities.by_game(game_id)
}

/// Cities owned by a player, oldest first.
#[must_use]
pub fn get_cities_by_player(cities: &CityProjection, owner_id: PlayerId) -> Vec<CityView> {
    cities.by_player(owner_id)
}

/// Positions of every city in a game, as needed by `FoundCity`.
#[must_use]
pub fn get_city_positions(cities: &CityProjection, game_id: GameId) -> Vec<Position> {
    cities.by_game(game_id).into_iter().map(|c| c.position).collect()
}
