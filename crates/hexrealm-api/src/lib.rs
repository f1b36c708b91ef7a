//! Hexrealm HTTP API.
//!
//! A thin `axum` adapter over [`hexrealm_engine::Engine`]: POST routes
//! build commands and dispatch them, GET routes read the projections.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router with its state attached.
pub fn app(state: AppState) -> Router {
    routes::api_router().with_state(state)
}
