//! Guide endpoints, including a guide's media attachments.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use helpcenter_common::AppResult;
use helpcenter_core::{CreateGuideInput, GuideView, MediaView, UpdateGuideInput};
use serde::Deserialize;

use crate::{
    extractors::{IdPath, ValidatedJson, ValidatedQuery, parse_id},
    middleware::AppState,
    response::{DetailResponse, MessageResponse},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/slug/{slug}", get(show_by_slug))
        .route("/{id}", get(show).put(update).patch(update).delete(remove))
        .route("/{id}/media", get(list_media))
        .route("/{id}/media/{media_id}", post(attach_media).delete(detach_media))
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    category_slug: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateGuideInput>,
) -> AppResult<Json<GuideView>> {
    let guide = state.guide_service.create(input).await?;
    Ok(Json(guide))
}

async fn list(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> AppResult<Json<Vec<GuideView>>> {
    let guides = state
        .guide_service
        .list(query.category_slug.as_deref())
        .await?;
    Ok(Json(guides))
}

async fn show(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<Json<GuideView>> {
    let guide = state.guide_service.get(id).await?;
    Ok(Json(guide))
}

async fn show_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<GuideView>> {
    let guide = state.guide_service.get_by_slug(&slug).await?;
    Ok(Json(guide))
}

async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateGuideInput>,
) -> AppResult<Json<GuideView>> {
    let guide = state.guide_service.update(id, input).await?;
    Ok(Json(guide))
}

async fn remove(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<Json<DetailResponse>> {
    state.guide_service.delete(id).await?;
    Ok(Json(DetailResponse::new("Guide deleted")))
}

async fn list_media(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<Vec<MediaView>>> {
    let media = state.media_service.guide_media(id).await?;
    Ok(Json(media))
}

async fn attach_media(
    State(state): State<AppState>,
    Path((guide_id, media_id)): Path<(String, String)>,
) -> AppResult<Json<MessageResponse>> {
    let guide_id = parse_id("id", &guide_id)?;
    let media_id = parse_id("media_id", &media_id)?;
    state.media_service.attach(guide_id, media_id).await?;
    Ok(Json(MessageResponse::new("Media attached to guide successfully")))
}

async fn detach_media(
    State(state): State<AppState>,
    Path((guide_id, media_id)): Path<(String, String)>,
) -> AppResult<Json<MessageResponse>> {
    let guide_id = parse_id("id", &guide_id)?;
    let media_id = parse_id("media_id", &media_id)?;
    state.media_service.detach(guide_id, media_id).await?;
    Ok(Json(MessageResponse::new("Media detached from guide successfully")))
}
