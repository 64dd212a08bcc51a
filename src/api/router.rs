use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::SharedState;
use crate::gateway;

/// Build the panel-facing router: health, the panel event channel, and the
/// static panel page for every other path.
pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let assets = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(handlers::health))
        // Panel event channel
        .route("/socket", get(gateway::panel_handler))
        .fallback_service(assets)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the game-client router. Every path upgrades to the client socket.
pub fn create_client_router(state: SharedState) -> Router {
    Router::new()
        .fallback(gateway::client_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
