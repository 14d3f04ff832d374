//! `api` crate — HTTP REST API layer.
//!
//! Routes:
//!   POST   /api/v1/components
//!   GET    /api/v1/components
//!   GET    /api/v1/components/{id}
//!   POST   /api/v1/components/{id}/deactivate
//!   POST   /api/v1/workflows
//!   GET    /api/v1/workflows?organization_id=…
//!   GET    /api/v1/workflows/{id}
//!   DELETE /api/v1/workflows/{id}
//!   POST   /api/v1/workflows/{id}/nodes
//!   POST   /api/v1/workflows/{id}/edges
//!   POST   /api/v1/workflows/{id}/publish
//!   POST   /api/v1/workflows/{id}/run
//!   GET    /api/v1/workflows/{id}/runs
//!   GET    /api/v1/runs/{id}
//!   GET    /api/v1/runs/{id}/logs
//!
//! Access control is a collaborator concern: callers are assumed to be
//! authorized for the organization ids they send, and no auth middleware
//! lives here.

pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use engine::Scheduler;
use ledger::DbPool;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub scheduler: Scheduler,
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/components",
            post(handlers::components::create).get(handlers::components::list),
        )
        .route("/api/v1/components/:id", get(handlers::components::get))
        .route(
            "/api/v1/components/:id/deactivate",
            post(handlers::components::deactivate),
        )
        .route(
            "/api/v1/workflows",
            post(handlers::workflows::create).get(handlers::workflows::list),
        )
        .route(
            "/api/v1/workflows/:id",
            get(handlers::workflows::get).delete(handlers::workflows::delete),
        )
        .route("/api/v1/workflows/:id/nodes", post(handlers::workflows::add_node))
        .route("/api/v1/workflows/:id/edges", post(handlers::workflows::add_edge))
        .route("/api/v1/workflows/:id/publish", post(handlers::workflows::publish))
        .route("/api/v1/workflows/:id/run", post(handlers::runs::submit))
        .route("/api/v1/workflows/:id/runs", get(handlers::runs::list_for_workflow))
        .route("/api/v1/runs/:id", get(handlers::runs::get))
        .route("/api/v1/runs/:id/logs", get(handlers::runs::logs))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(bind: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("API listening on {bind}");
    axum::serve(listener, router(state)).await
}
