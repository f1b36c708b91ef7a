//! Routes for the Game bounded context.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use hexrealm_core::ids::{GameId, PlayerId, UserId};
use hexrealm_game::application::projections::{GameView, MapView, PlayerView};
use hexrealm_game::domain::commands;
use hexrealm_game::domain::map::MapTile;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::CommandResponse;
use crate::state::AppState;

/// Request body for POST /create.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    /// The user creating the game. They take the first seat.
    pub user_id: UserId,
    /// Display name, 3 to 50 characters.
    pub name: String,
}

/// Request body for POST /join.
#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    /// The game to join.
    pub game_id: GameId,
    /// The joining user.
    pub user_id: UserId,
}

/// Request body for POST /start.
#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    /// The game to start.
    pub game_id: GameId,
}

/// Request body for POST /end-turn.
#[derive(Debug, Deserialize)]
pub struct EndTurnRequest {
    /// The game in progress.
    pub game_id: GameId,
    /// The active player.
    pub player_id: PlayerId,
}

/// Optional filter for GET /.
#[derive(Debug, Deserialize)]
pub struct GamesQuery {
    /// Only games this user has a seat in.
    pub user_id: Option<UserId>,
}

/// Response body for commands that seat a player.
#[derive(Debug, Serialize)]
pub struct SeatResponse {
    /// The game stream.
    pub aggregate_id: Uuid,
    /// The new player.
    pub player_id: PlayerId,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

/// POST /create
#[instrument(skip(state, request), fields(user_id = %request.user_id))]
async fn create_game(
    State(state): State<AppState>,
    Json(request): Json<CreateGameRequest>,
) -> Result<Json<SeatResponse>, ApiError> {
    let command = commands::CreateGame {
        correlation_id: Uuid::new_v4(),
        game_id: GameId::generate(),
        player_id: PlayerId::generate(),
        user_id: request.user_id,
        name: request.name,
        created_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling create_game command");

    let (game_id, player_id) = (command.game_id, command.player_id);
    let stored_events = state.engine.execute(command).await?;

    Ok(Json(SeatResponse {
        aggregate_id: game_id.as_uuid(),
        player_id,
        event_ids: stored_events.iter().map(|e| e.event_id).collect(),
    }))
}

/// POST /join
#[instrument(skip(state, request), fields(game_id = %request.game_id))]
async fn join_game(
    State(state): State<AppState>,
    Json(request): Json<JoinGameRequest>,
) -> Result<Json<SeatResponse>, ApiError> {
    let command = commands::JoinGame {
        correlation_id: Uuid::new_v4(),
        game_id: request.game_id,
        player_id: PlayerId::generate(),
        user_id: request.user_id,
        joined_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling join_game command");

    let player_id = command.player_id;
    let stored_events = state.engine.execute(command).await?;

    Ok(Json(SeatResponse {
        aggregate_id: request.game_id.as_uuid(),
        player_id,
        event_ids: stored_events.iter().map(|e| e.event_id).collect(),
    }))
}

/// POST /start
#[instrument(skip(state, request), fields(game_id = %request.game_id))]
async fn start_game(
    State(state): State<AppState>,
    Json(request): Json<StartGameRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StartGame {
        correlation_id: Uuid::new_v4(),
        game_id: request.game_id,
        started_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling start_game command");

    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(
        request.game_id.as_uuid(),
        &stored_events,
    )))
}

/// POST /end-turn
#[instrument(skip(state, request), fields(game_id = %request.game_id, player_id = %request.player_id))]
async fn end_turn(
    State(state): State<AppState>,
    Json(request): Json<EndTurnRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::EndTurn {
        correlation_id: Uuid::new_v4(),
        game_id: request.game_id,
        player_id: request.player_id,
        ended_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling end_turn command");

    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(
        request.game_id.as_uuid(),
        &stored_events,
    )))
}

/// GET /
async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<GamesQuery>,
) -> Json<Vec<GameView>> {
    let queries = state.engine.queries();
    Json(match query.user_id {
        Some(user_id) => queries.get_user_games(user_id),
        None => queries.get_all_games(),
    })
}

/// GET /{game_id}
async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Result<Json<GameView>, ApiError> {
    Ok(Json(state.engine.queries().get_game_view(game_id)?))
}

/// GET /{game_id}/map
async fn get_map(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Result<Json<MapView>, ApiError> {
    Ok(Json(state.engine.queries().get_map_view(game_id)?))
}

/// GET /{game_id}/map/tiles
async fn get_map_tiles(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Result<Json<Vec<MapTile>>, ApiError> {
    Ok(Json(state.engine.queries().get_map_tiles(game_id)?))
}

/// GET /players/{player_id}
async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<PlayerView>, ApiError> {
    Ok(Json(state.engine.queries().get_player_view(player_id)?))
}

/// Returns the router for the game context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_games))
        .route("/create", post(create_game))
        .route("/join", post(join_game))
        .route("/start", post(start_game))
        .route("/end-turn", post(end_turn))
        .route("/players/{player_id}", get(get_player))
        .route("/{game_id}", get(get_game))
        .route("/{game_id}/map", get(get_map))
        .route("/{game_id}/map/tiles", get(get_map_tiles))
}
