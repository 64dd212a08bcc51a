use axum::Json;
use axum::extract::State;

use super::models::HealthResponse;
use super::state::SharedState;

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at,
        uptime: state.start_time.elapsed().as_secs(),
        clients: state.relay.clients().len().await,
        panels: state.relay.panels().panel_count(),
    })
}
