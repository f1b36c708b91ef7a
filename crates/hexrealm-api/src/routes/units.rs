//! Routes for the Unit bounded context.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use hexrealm_core::ids::{GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;
use hexrealm_core::unit_type::UnitType;
use hexrealm_unit::application::projections::UnitView;
use hexrealm_unit::domain::commands;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::CommandResponse;
use crate::state::AppState;

/// Request body for POST /create.
#[derive(Debug, Deserialize)]
pub struct CreateUnitRequest {
    /// The game the unit belongs to.
    pub game_id: GameId,
    /// The owning player.
    pub owner_id: PlayerId,
    /// Kind of unit, e.g. `"ARCHER"`.
    pub unit_type: UnitType,
    /// Starting position.
    pub position: Position,
}

/// Request body for POST /move.
#[derive(Debug, Deserialize)]
pub struct MoveUnitRequest {
    /// The unit to move.
    pub unit_id: UnitId,
    /// Destination.
    pub to: Position,
}

/// Request body for POST /attack.
#[derive(Debug, Deserialize)]
pub struct AttackUnitRequest {
    /// The attacking unit.
    pub attacker_id: UnitId,
    /// The unit being attacked.
    pub target_id: UnitId,
}

/// Request body for POST /destroy.
#[derive(Debug, Deserialize)]
pub struct DestroyUnitRequest {
    /// The unit to remove from play.
    pub unit_id: UnitId,
}

/// POST /create
#[instrument(skip(state, request), fields(game_id = %request.game_id, unit_type = request.unit_type.as_str()))]
async fn create_unit(
    State(state): State<AppState>,
    Json(request): Json<CreateUnitRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::CreateUnit {
        correlation_id: Uuid::new_v4(),
        unit_id: UnitId::generate(),
        owner_id: request.owner_id,
        game_id: request.game_id,
        unit_type: request.unit_type,
        position: request.position,
        created_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling create_unit command");

    let unit_id = command.unit_id;
    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(unit_id.as_uuid(), &stored_events)))
}

/// POST /move
///
/// Positions of the game's other living units come from the read side.
#[instrument(skip(state, request), fields(unit_id = %request.unit_id))]
async fn move_unit(
    State(state): State<AppState>,
    Json(request): Json<MoveUnitRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let queries = state.engine.queries();
    let unit = queries.get_unit_view(request.unit_id)?;
    let command = commands::MoveUnit {
        correlation_id: Uuid::new_v4(),
        unit_id: request.unit_id,
        to: request.to,
        occupied_positions: queries.get_occupied_positions(unit.game_id, Some(request.unit_id)),
        moved_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling move_unit command");

    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(
        request.unit_id.as_uuid(),
        &stored_events,
    )))
}

/// POST /attack
///
/// The attack is recorded on the target's stream.
#[instrument(skip(state, request), fields(attacker_id = %request.attacker_id, target_id = %request.target_id))]
async fn attack_unit(
    State(state): State<AppState>,
    Json(request): Json<AttackUnitRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::AttackUnit {
        correlation_id: Uuid::new_v4(),
        attacker_id: request.attacker_id,
        target_id: request.target_id,
        attacked_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling attack_unit command");

    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(
        request.target_id.as_uuid(),
        &stored_events,
    )))
}

/// POST /destroy
#[instrument(skip(state, request), fields(unit_id = %request.unit_id))]
async fn destroy_unit(
    State(state): State<AppState>,
    Json(request): Json<DestroyUnitRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::DestroyUnit {
        correlation_id: Uuid::new_v4(),
        unit_id: request.unit_id,
        destroyed_at: state.engine.clock().timestamp(),
    };

    info!(correlation_id = %command.correlation_id, "handling destroy_unit command");

    let stored_events = state.engine.execute(command).await?;

    Ok(Json(CommandResponse::new(
        request.unit_id.as_uuid(),
        &stored_events,
    )))
}

/// GET /{unit_id}
async fn get_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<UnitId>,
) -> Result<Json<UnitView>, ApiError> {
    Ok(Json(state.engine.queries().get_unit_view(unit_id)?))
}

/// GET /by-game/{game_id}
async fn units_by_game(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Json<Vec<UnitView>> {
    Json(state.engine.queries().get_units_by_game(game_id))
}

/// GET /by-player/{player_id}
async fn units_by_player(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Json<Vec<UnitView>> {
    Json(state.engine.queries().get_units_by_player(player_id))
}

/// Returns the router for the unit context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_unit))
        .route("/move", post(move_unit))
        .route("/attack", post(attack_unit))
        .route("/destroy", post(destroy_unit))
        .route("/by-game/{game_id}", get(units_by_game))
        .route("/by-player/{player_id}", get(units_by_player))
        .route("/{unit_id}", get(get_unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::routes::test_helpers::{get, post, send, test_app_state};

    async fn create(app: Router, game_id: GameId, owner_id: PlayerId, x: i32, y: i32) -> Value {
        let body = json!({
            "game_id": game_id,
            "owner_id": owner_id,
            "unit_type": "WARRIOR",
            "position": { "x": x, "y": y },
        });
        let (status, json) = send(app, post("/create", &body)).await;
        assert_eq!(status, StatusCode::OK);
        json["aggregate_id"].clone()
    }

    #[tokio::test]
    async fn test_create_then_get_unit() {
        // Arrange
        let state = test_app_state();
        let app = router().with_state(state.clone());
        let unit_id = create(app.clone(), GameId::generate(), PlayerId::generate(), 2, 2).await;
        state.engine.wait_until_idle().await;

        // Act
        let (status, json) = send(app, get(&format!("/{}", unit_id.as_str().unwrap()))).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["unit_type"], "WARRIOR");
        assert_eq!(json["position"], json!({ "x": 2, "y": 2 }));
    }

    #[tokio::test]
    async fn test_move_onto_occupied_cell_returns_422() {
        // Arrange
        let state = test_app_state();
        let app = router().with_state(state.clone());
        let (game_id, owner_id) = (GameId::generate(), PlayerId::generate());
        let mover = create(app.clone(), game_id, owner_id, 2, 2).await;
        create(app.clone(), game_id, owner_id, 3, 2).await;
        state.engine.wait_until_idle().await;

        // Act
        let (status, json) = send(
            app,
            post("/move", &json!({ "unit_id": mover, "to": { "x": 3, "y": 2 } })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "position_occupied");
    }

    #[tokio::test]
    async fn test_move_unknown_unit_returns_404() {
        let app = router().with_state(test_app_state());

        let (status, _) = send(
            app,
            post(
                "/move",
                &json!({ "unit_id": UnitId::generate(), "to": { "x": 1, "y": 1 } }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_attack_own_unit_returns_422() {
        // Arrange
        let state = test_app_state();
        let app = router().with_state(state.clone());
        let (game_id, owner_id) = (GameId::generate(), PlayerId::generate());
        let attacker = create(app.clone(), game_id, owner_id, 4, 4).await;
        let target = create(app.clone(), game_id, owner_id, 5, 4).await;

        // Act
        let (status, json) = send(
            app,
            post(
                "/attack",
                &json!({ "attacker_id": attacker, "target_id": target }),
            ),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "friendly_fire");
    }
}
