//! Routes for the Diplomacy bounded context.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use hexrealm_core::ids::{DiplomacyId, GameId, PlayerId};
use hexrealm_diplomacy::application::projections::DiplomacyView;
use hexrealm_diplomacy::domain::aggregates::AgreementType;
use hexrealm_diplomacy::domain::commands;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::CommandResponse;
use crate::state::AppState;

/// Request body for POST /propose.
#[derive(Debug, Deserialize)]
pub struct ProposeDiplomacyRequest {
    /// The game both players are seated in.
    pub game_id: GameId,
    /// The proposing player.
    pub initiator_id: PlayerId,
    /// The player the proposal is addressed to.
    pub target_id: PlayerId,
    /// Kind of agreement, e.g. `"ALLIANCE"`.
    pub agreement_type: AgreementType,
}

/// Request body for the accept, decline and end routes.
#[derive(Debug, Deserialize)]
pub struct DiplomacyActionRequest {
    /// The agreement acted on.
    pub diplomacy_id: DiplomacyId,
    /// The player acting.
    pub actor_id: PlayerId,
}

/// Query string for GET /status.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub game_id: GameId,
    pub player_a: PlayerId,
    pub player_b: PlayerId,
}

/// POST /propose
#[instrument(skip(state, request), fields(game_id = %request.game_id, initiator_id = %request.initiator_id))]
async fn propose(
    State(state): State<AppState>,
    Json(request): Json<ProposeDiplomacyRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ProposeDiplomacy {
        correlation_id: Uuid::new_v4(),
        diplomacy_id: DiplomacyId::generate(),
        game_id: request.game_id,
        initiator_id: request.initiator_id,
        target_id: request.target_id,
        agreement_type: request.agreement_type,
        proposed_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling propose_diplomacy command");

    let diplomacy_id = command.diplomacy_id;
    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(
        diplomacy_id.as_uuid(),
        &stored_events,
    )))
}

/// POST /accept
#[instrument(skip(state, request), fields(diplomacy_id = %request.diplomacy_id, actor_id = %request.actor_id))]
async fn accept(
    State(state): State<AppState>,
    Json(request): Json<DiplomacyActionRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::AcceptDiplomacy {
        correlation_id: Uuid::new_v4(),
        diplomacy_id: request.diplomacy_id,
        actor_id: request.actor_id,
        accepted_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling accept_diplomacy command");

    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(
        request.diplomacy_id.as_uuid(),
        &stored_events,
    )))
}

/// POST /decline
#[instrument(skip(state, request), fields(diplomacy_id = %request.diplomacy_id, actor_id = %request.actor_id))]
async fn decline(
    State(state): State<AppState>,
    Json(request): Json<DiplomacyActionRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::DeclineDiplomacy {
        correlation_id: Uuid::new_v4(),
        diplomacy_id: request.diplomacy_id,
        actor_id: request.actor_id,
        declined_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling decline_diplomacy command");

    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(
        request.diplomacy_id.as_uuid(),
        &stored_events,
    )))
}

/// POST /end
#[instrument(skip(state, request), fields(diplomacy_id = %request.diplomacy_id, actor_id = %request.actor_id))]
async fn end(
    State(state): State<AppState>,
    Json(request): Json<DiplomacyActionRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::EndDiplomacy {
        correlation_id: Uuid::new_v4(),
        diplomacy_id: request.diplomacy_id,
        actor_id: request.actor_id,
        ended_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling end_diplomacy command");

    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(
        request.diplomacy_id.as_uuid(),
        &stored_events,
    )))
}

/// GET /{diplomacy_id}
async fn get_agreement(
    State(state): State<AppState>,
    Path(diplomacy_id): Path<DiplomacyId>,
) -> Result<Json<DiplomacyView>, ApiError> {
    Ok(Json(state.engine.queries().get_diplomacy_view(diplomacy_id)?))
}

/// GET /by-game/{game_id}
async fn agreements_by_game(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Json<Vec<DiplomacyView>> {
    Json(state.engine.queries().get_diplomacy_by_game(game_id))
}

/// GET /status?game_id=..&player_a=..&player_b=..
async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<DiplomacyView>, ApiError> {
    Ok(Json(state.engine.queries().get_diplomacy_status(
        query.game_id,
        query.player_a,
        query.player_b,
    )?))
}

/// Returns the router for the diplomacy context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/propose", post(propose))
        .route("/accept", post(accept))
        .route("/decline", post(decline))
        .route("/end", post(end))
        .route("/status", get(status))
        .route("/by-game/{game_id}", get(agreements_by_game))
        .route("/{diplomacy_id}", get(get_agreement))
}
