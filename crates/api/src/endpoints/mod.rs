//! API endpoints.

mod categories;
mod feedback;
mod guides;
mod health;
mod media;

use axum::{Router, middleware::from_fn_with_state};

use crate::middleware::{AppState, editor_guard};

/// Create the REST router: `/health` plus the guarded `/dev-editor` tree.
///
/// Correlation ids are layered on by the caller so they also cover routes
/// merged in from other crates.
pub fn router(state: AppState) -> Router {
    let editor = Router::new()
        .nest("/categories", categories::router())
        .nest("/guides", guides::router())
        .nest("/media", media::router())
        .nest("/feedback", feedback::router())
        .route_layer(from_fn_with_state(state.clone(), editor_guard));

    Router::new()
        .merge(health::router())
        .nest("/dev-editor", editor)
        .with_state(state)
}
