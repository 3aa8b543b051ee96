//! Health probe.

use axum::{Json, Router, extract::State, routing::get};

use crate::{middleware::AppState, response::HealthResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        environment: state.environment,
    })
}
