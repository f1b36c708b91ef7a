//! Routes for the Visibility bounded context. Read-only: fog of war is
//! recomputed by the engine whenever units or cities change.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use hexrealm_core::ids::{GameId, PlayerId};
use hexrealm_visibility::application::projections::PlayerVisibilityView;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{game_id}
async fn game_visibility(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Json<Vec<PlayerVisibilityView>> {
    Json(state.engine.queries().get_game_visibility(game_id))
}

/// GET /{game_id}/players/{player_id}
async fn player_visibility(
    State(state): State<AppState>,
    Path((game_id, player_id)): Path<(GameId, PlayerId)>,
) -> Result<Json<PlayerVisibilityView>, ApiError> {
    Ok(Json(
        state
            .engine
            .queries()
            .get_player_visibility(game_id, player_id)?,
    ))
}

/// Returns the router for the visibility context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{game_id}", get(game_visibility))
        .route("/{game_id}/players/{player_id}", get(player_visibility))
}
