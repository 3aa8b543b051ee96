//! Feedback review endpoints.
//!
//! Submission is public and goes through GraphQL; editors only read and delete.

use axum::{Json, Router, extract::State, routing::get};
use helpcenter_common::AppResult;
use helpcenter_core::FeedbackView;

use crate::{extractors::IdPath, middleware::AppState, response::DetailResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(show).delete(remove))
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<FeedbackView>>> {
    let feedback = state.feedback_service.list().await?;
    Ok(Json(feedback))
}

async fn show(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<Json<FeedbackView>> {
    let feedback = state.feedback_service.get(id).await?;
    Ok(Json(feedback))
}

async fn remove(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<Json<DetailResponse>> {
    state.feedback_service.delete(id).await?;
    Ok(Json(DetailResponse::new("Feedback deleted")))
}
