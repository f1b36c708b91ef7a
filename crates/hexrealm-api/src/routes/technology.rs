//! Routes for the Technology bounded context.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use hexrealm_core::ids::{PlayerId, TechnologyId};
use hexrealm_technology::application::projections::TechnologyTreeView;
use hexrealm_technology::domain::aggregates::TechnologyTree;
use hexrealm_technology::domain::catalog::Technology;
use hexrealm_technology::domain::commands;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::CommandResponse;
use crate::state::AppState;

/// Request body for POST /grant-science.
#[derive(Debug, Deserialize)]
pub struct GrantSciencePointsRequest {
    /// The player credited.
    pub player_id: PlayerId,
    /// Points to add.
    pub amount: u32,
}

/// Request body for POST /discover.
#[derive(Debug, Deserialize)]
pub struct DiscoverTechnologyRequest {
    /// The researching player.
    pub player_id: PlayerId,
    /// Catalog technology to discover.
    pub technology_id: TechnologyId,
}

/// POST /grant-science
#[instrument(skip(state, request), fields(player_id = %request.player_id, amount = request.amount))]
async fn grant_science_points(
    State(state): State<AppState>,
    Json(request): Json<GrantSciencePointsRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::GrantSciencePoints {
        correlation_id: Uuid::new_v4(),
        player_id: request.player_id,
        amount: request.amount,
        granted_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling grant_science_points command");

    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(
        TechnologyTree::stream_id(request.player_id),
        &stored_events,
    )))
}

/// POST /discover
#[instrument(skip(state, request), fields(player_id = %request.player_id, technology_id = %request.technology_id))]
async fn discover_technology(
    State(state): State<AppState>,
    Json(request): Json<DiscoverTechnologyRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::DiscoverTechnology {
        correlation_id: Uuid::new_v4(),
        player_id: request.player_id,
        technology_id: request.technology_id,
        discovered_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling discover_technology command");

    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(
        TechnologyTree::stream_id(request.player_id),
        &stored_events,
    )))
}

/// GET /catalog
async fn list_technologies(State(state): State<AppState>) -> Json<Vec<Technology>> {
    Json(state.engine.queries().get_all_technologies())
}

/// GET /catalog/{technology_id}
async fn get_technology(
    State(state): State<AppState>,
    Path(technology_id): Path<TechnologyId>,
) -> Result<Json<Technology>, ApiError> {
    Ok(Json(
        state.engine.queries().get_technology_details(technology_id)?,
    ))
}

/// GET /trees/{player_id}
async fn get_tree(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<TechnologyTreeView>, ApiError> {
    Ok(Json(state.engine.queries().get_technology_tree(player_id)?))
}

/// GET /trees/{player_id}/available
async fn available_technologies(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<Vec<Technology>>, ApiError> {
    Ok(Json(
        state.engine.queries().get_available_technologies(player_id)?,
    ))
}

/// Returns the router for the technology context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/grant-science", post(grant_science_points))
        .route("/discover", post(discover_technology))
        .route("/catalog", get(list_technologies))
        .route("/catalog/{technology_id}", get(get_technology))
        .route("/trees/{player_id}", get(get_tree))
        .route("/trees/{player_id}/available", get(available_technologies))
}
