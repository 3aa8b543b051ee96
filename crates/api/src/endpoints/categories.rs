//! Category endpoints.

use axum::{Json, Router, extract::{Path, State}, routing::get};
use helpcenter_common::AppResult;
use helpcenter_core::{CategoryView, CreateCategoryInput, UpdateCategoryInput};

use crate::{
    extractors::{IdPath, ValidatedJson},
    middleware::AppState,
    response::DetailResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/slug/{slug}", get(show_by_slug))
        .route("/{id}", get(show).put(update).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCategoryInput>,
) -> AppResult<Json<CategoryView>> {
    let category = state.category_service.create(input).await?;
    Ok(Json(category))
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryView>>> {
    let categories = state.category_service.list().await?;
    Ok(Json(categories))
}

async fn show(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<Json<CategoryView>> {
    let category = state.category_service.get(id).await?;
    Ok(Json(category))
}

async fn show_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<CategoryView>> {
    let category = state.category_service.get_by_slug(&slug).await?;
    Ok(Json(category))
}

async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategoryInput>,
) -> AppResult<Json<CategoryView>> {
    let category = state.category_service.update(id, input).await?;
    Ok(Json(category))
}

async fn remove(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<Json<DetailResponse>> {
    state.category_service.delete(id).await?;
    Ok(Json(DetailResponse::new("Category deleted")))
}
