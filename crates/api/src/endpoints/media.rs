//! Media endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    routing::{get, post},
};
use helpcenter_common::{AppError, AppResult};
use helpcenter_core::{CreateMediaInput, GuideView, MediaView, UpdateMediaInput, UploadMediaInput};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    extractors::{IdPath, ValidatedJson, ValidatedQuery, parse_id},
    middleware::AppState,
    response::{MessageResponse, UrlResponse},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/upload", post(upload))
        .route("/{id}", get(show).put(update).patch(update).delete(remove))
        .route("/{id}/optimized", get(optimized))
        .route("/{id}/guides", get(guides))
}

#[derive(Debug, Default, Deserialize)]
struct OptimizedQuery {
    width: Option<u32>,
    height: Option<u32>,
}

async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateMediaInput>,
) -> AppResult<Json<MediaView>> {
    let media = state.media_service.create(input).await?;
    Ok(Json(media))
}

/// Multipart upload with fields `file`, `alt` and `guide_id`.
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<MediaView>> {
    let mut multipart = multipart.map_err(|rejection| {
        AppError::invalid_field("file", rejection.body_text(), Value::Null, "content_type")
    })?;
    let mut file = None;
    let mut alt = None;
    let mut guide_id = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((filename, content_type, data));
            }
            Some("alt") => {
                let text = field.text().await.map_err(multipart_error)?;
                alt = Some(text).filter(|t| !t.trim().is_empty());
            }
            Some("guide_id") => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    guide_id = Some(parse_id("guide_id", text.trim())?);
                }
            }
            _ => {}
        }
    }

    let Some((filename, content_type, data)) = file else {
        return Err(AppError::invalid_field(
            "file",
            "A file is required",
            Value::Null,
            "missing",
        ));
    };

    let media = state
        .media_service
        .upload(UploadMediaInput {
            filename,
            content_type,
            data,
            alt,
            guide_id,
        })
        .await?;
    Ok(Json(media))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::invalid_field("file", err.body_text(), Value::Null, "invalid_multipart")
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<MediaView>>> {
    let media = state.media_service.list().await?;
    Ok(Json(media))
}

async fn show(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<Json<MediaView>> {
    let media = state.media_service.get(id).await?;
    Ok(Json(media))
}

async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateMediaInput>,
) -> AppResult<Json<MediaView>> {
    let media = state.media_service.update(id, input).await?;
    Ok(Json(media))
}

async fn remove(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<Json<MessageResponse>> {
    state.media_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Media deleted successfully")))
}

async fn optimized(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedQuery(query): ValidatedQuery<OptimizedQuery>,
) -> AppResult<Json<UrlResponse>> {
    let url = state
        .media_service
        .optimized_url(id, query.width, query.height)
        .await?;
    Ok(Json(UrlResponse { url }))
}

async fn guides(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<Json<Vec<GuideView>>> {
    let guides = state.media_service.media_guides(id).await?;
    Ok(Json(guides))
}
