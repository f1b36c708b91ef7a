//! Routes for the City bounded context.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use hexrealm_city::application::projections::CityView;
use hexrealm_city::domain::commands;
use hexrealm_core::ids::{CityId, GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::CommandResponse;
use crate::state::AppState;

/// Request body for POST /found.
#[derive(Debug, Deserialize)]
pub struct FoundCityRequest {
    /// The game the city is founded in.
    pub game_id: GameId,
    /// The founding player.
    pub owner_id: PlayerId,
    /// The unit spent on the founding.
    pub unit_id: UnitId,
    /// City name.
    pub name: String,
    /// Where to found the city.
    pub position: Position,
}

/// POST /found
///
/// Terrain, the positions of existing cities and the founding unit's
/// owner come from the read side.
#[instrument(skip(state, request), fields(game_id = %request.game_id, unit_id = %request.unit_id))]
async fn found_city(
    State(state): State<AppState>,
    Json(request): Json<FoundCityRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let queries = state.engine.queries();
    let terrain = queries.terrain_at(request.game_id, request.position)?;
    let founding_unit_owner = queries
        .get_unit_view(request.unit_id)
        .ok()
        .filter(|unit| unit.game_id == request.game_id && !unit.is_dead)
        .map(|unit| unit.owner_id);
    let command = commands::FoundCity {
        correlation_id: Uuid::new_v4(),
        city_id: CityId::generate(),
        owner_id: request.owner_id,
        game_id: request.game_id,
        unit_id: request.unit_id,
        founding_unit_owner,
        name: request.name,
        position: request.position,
        terrain,
        existing_city_positions: queries.get_city_positions(request.game_id),
        founded_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling found_city command");

    let city_id = command.city_id;
    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(city_id.as_uuid(), &stored_events)))
}

/// GET /{city_id}
async fn get_city(
    State(state): State<AppState>,
    Path(city_id): Path<CityId>,
) -> Result<Json<CityView>, ApiError> {
    Ok(Json(state.engine.queries().get_city_view(city_id)?))
}

/// GET /by-game/{game_id}
async fn cities_by_game(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Json<Vec<CityView>> {
    Json(state.engine.queries().get_cities_by_game(game_id))
}

/// GET /by-player/{player_id}
async fn cities_by_player(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Json<Vec<CityView>> {
    Json(state.engine.queries().get_cities_by_player(player_id))
}

/// Returns the router for the city context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/found", post(found_city))
        .route("/by-game/{game_id}", get(cities_by_game))
        .route("/by-player/{player_id}", get(cities_by_player))
        .route("/{city_id}", get(get_city))
}
