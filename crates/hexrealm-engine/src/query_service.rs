//! Read-side facade over every bounded context.
//!
//! Each method delegates to the owning context's query handler. Reads
//! are eventually consistent; call [`Engine::wait_until_idle`] first when
//! a read must observe a write just made.
//!
//! [`Engine::wait_until_idle`]: crate::Engine::wait_until_idle

use std::sync::Arc;

use hexrealm_city::application::projections::CityView;
use hexrealm_city::application::query_handlers as city;
use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{CityId, DiplomacyId, GameId, PlayerId, TechnologyId, UnitId, UserId};
use hexrealm_core::position::Position;
use hexrealm_core::terrain::Terrain;
use hexrealm_diplomacy::application::projections::DiplomacyView;
use hexrealm_diplomacy::application::query_handlers as diplomacy;
use hexrealm_game::application::projections::{GameView, MapView, PlayerView};
use hexrealm_game::application::query_handlers as game;
use hexrealm_game::domain::map::MapTile;
use hexrealm_technology::application::projections::TechnologyTreeView;
use hexrealm_technology::application::query_handlers as technology;
use hexrealm_technology::domain::catalog::Technology;
use hexrealm_unit::application::projections::UnitView;
use hexrealm_unit::application::query_handlers as unit;
use hexrealm_visibility::application::projections::PlayerVisibilityView;
use hexrealm_visibility::application::query_handlers as visibility;

use crate::read_models::ReadModels;

/// Queries against the engine's read models.
#[derive(Debug, Clone)]
pub struct QueryService {
    read_models: Arc<ReadModels>,
}

impl QueryService {
    #[must_use]
    pub fn new(read_models: Arc<ReadModels>) -> Self {
        Self { read_models }
    }

    // Game

    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the game is not projected.
    pub fn get_game_view(&self, game_id: GameId) -> Result<GameView, DomainError> {
        game::get_game_view(&self.read_models.games, game_id)
    }

    #[must_use]
    pub fn get_user_games(&self, user_id: UserId) -> Vec<GameView> {
        game::get_user_games(&self.read_models.games, user_id)
    }

    #[must_use]
    pub fn get_all_games(&self) -> Vec<GameView> {
        game::get_all_games(&self.read_models.games)
    }

    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the player is not projected.
    pub fn get_player_view(&self, player_id: PlayerId) -> Result<PlayerView, DomainError> {
        game::get_player_view(&self.read_models.players, player_id)
    }

    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the game has no map yet.
    pub fn get_map_view(&self, game_id: GameId) -> Result<MapView, DomainError> {
        game::get_map_view(&self.read_models.maps, game_id)
    }

    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the game has no map yet.
    pub fn get_map_tiles(&self, game_id: GameId) -> Result<Vec<MapTile>, DomainError> {
        game::get_map_tiles(&self.read_models.maps, game_id)
    }

    /// # Errors
    ///
    /// Returns `AggregateNotFound` without a map and `Validation` for a
    /// position off the map.
    pub fn terrain_at(&self, game_id: GameId, position: Position) -> Result<Terrain, DomainError> {
        game::terrain_at(&self.read_models.maps, game_id, position)
    }

    // City

    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the city is not projected.
    pub fn get_city_view(&self, city_id: CityId) -> Result<CityView, DomainError> {
        city::get_city_view(&self.read_models.cities, city_id)
    }

    #[must_use]
    pub fn get_cities_by_game(&self, game_id: GameId) -> Vec<CityView> {
        city::get_cities_by_game(&self.read_models.cities, game_id)
    }

    #[must_use]
    pub fn get_cities_by_player(&self, owner_id: PlayerId) -> Vec<CityView> {
        city::get_cities_by_player(&self.read_models.cities, owner_id)
    }

    #[must_use]
    pub fn get_city_positions(&self, game_id: GameId) -> Vec<Position> {
        city::get_city_positions(&self.read_models.cities, game_id)
    }

    // Unit

    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the unit is not projected.
    pub fn get_unit_view(&self, unit_id: UnitId) -> Result<UnitView, DomainError> {
        unit::get_unit_view(&self.read_models.units, unit_id)
    }

    #[must_use]
    pub fn get_units_by_game(&self, game_id: GameId) -> Vec<UnitView> {
        unit::get_units_by_game(&self.read_models.units, game_id)
    }

    #[must_use]
    pub fn get_units_by_player(&self, owner_id: PlayerId) -> Vec<UnitView> {
        unit::get_units_by_player(&self.read_models.units, owner_id)
    }

    #[must_use]
    pub fn get_occupied_positions(&self, game_id: GameId, moving: Option<UnitId>) -> Vec<Position> {
        unit::get_occupied_positions(&self.read_models.units, game_id, moving)
    }

    // Technology

    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the tree is not projected.
    pub fn get_technology_tree(&self, player_id: PlayerId) -> Result<TechnologyTreeView, DomainError> {
        technology::get_technology_tree(&self.read_models.technology, player_id)
    }

    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the tree is not projected.
    pub fn get_available_technologies(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<Technology>, DomainError> {
        technology::get_available_technologies(&self.read_models.technology, player_id)
    }

    /// # Errors
    ///
    /// Returns `AggregateNotFound` for an id outside the catalog.
    pub fn get_technology_details(
        &self,
        technology_id: TechnologyId,
    ) -> Result<Technology, DomainError> {
        technology::get_technology_details(technology_id)
    }

    #[must_use]
    pub fn get_all_technologies(&self) -> Vec<Technology> {
        technology::get_all_technologies()
    }

    // Diplomacy

    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the agreement is not projected.
    pub fn get_diplomacy_view(&self, diplomacy_id: DiplomacyId) -> Result<DiplomacyView, DomainError> {
        diplomacy::get_diplomacy_view(&self.read_models.diplomacy, diplomacy_id)
    }

    #[must_use]
    pub fn get_diplomacy_by_game(&self, game_id: GameId) -> Vec<DiplomacyView> {
        diplomacy::get_diplomacy_by_game(&self.read_models.diplomacy, game_id)
    }

    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the two players never negotiated.
    pub fn get_diplomacy_status(
        &self,
        game_id: GameId,
        player_a: PlayerId,
        player_b: PlayerId,
    ) -> Result<DiplomacyView, DomainError> {
        diplomacy::get_diplomacy_status(&self.read_models.diplomacy, game_id, player_a, player_b)
    }

    // Visibility

    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the player has no visibility yet.
    pub fn get_player_visibility(
        &self,
        game_id: GameId,
        player_id: PlayerId,
    ) -> Result<PlayerVisibilityView, DomainError> {
        visibility::get_player_visibility(&self.read_models.visibility, game_id, player_id)
    }

    #[must_use]
    pub fn get_game_visibility(&self, game_id: GameId) -> Vec<PlayerVisibilityView> {
        visibility::get_game_visibility(&self.read_models.visibility, game_id)
    }
}
