//! Hexrealm API server entry point.

use std::sync::Arc;

use hexrealm_api::config::AppConfig;
use hexrealm_api::error::AppError;
use hexrealm_api::state::AppState;
use hexrealm_api::telemetry;
use hexrealm_core::clock::SystemClock;
use hexrealm_core::repository::EventRepository;
use hexrealm_core::rng::StdRandomRng;
use hexrealm_engine::Engine;
use hexrealm_event_store::{InMemoryEventRepository, PgEventRepository};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Hexrealm API server");

    let event_repository = event_repository(&config).await?;
    let engine = Engine::start(
        event_repository,
        Arc::new(SystemClock),
        Box::new(StdRandomRng::from_os()),
        config.engine,
    )?;
    engine.catch_up().await?;

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = hexrealm_api::app(AppState::new(Arc::new(engine)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry.shutdown();
    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory store.
async fn event_repository(config: &AppConfig) -> Result<Arc<dyn EventRepository>, AppError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, events are kept in memory only");
        return Ok(Arc::new(InMemoryEventRepository::new()));
    };
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    let repository = PgEventRepository::new(pool);
    repository.ensure_schema().await?;
    Ok(Arc::new(repository))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
