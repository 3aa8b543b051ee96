//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use helpcenter_common::correlation::{self, CORRELATION_ID_HEADER, REQUEST_ID_HEADER};
use helpcenter_common::{AppError, Config, RequestIds, SharedStorage};
use helpcenter_core::{CategoryService, FeedbackService, GuideService, MediaService};
use sea_orm::DatabaseConnection;
use tracing::Instrument;

/// Header carrying the editor key.
pub const EDITOR_KEY_HEADER: &str = "x-dev-editor-key";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub category_service: CategoryService,
    pub guide_service: GuideService,
    pub media_service: MediaService,
    pub feedback_service: FeedbackService,
    pub environment: String,
    pub editor_key: Arc<str>,
}

impl AppState {
    /// Build the services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, storage: SharedStorage, config: &Config) -> Self {
        Self {
            category_service: CategoryService::new(db.clone()),
            guide_service: GuideService::new(db.clone()),
            media_service: MediaService::new(db.clone(), storage),
            feedback_service: FeedbackService::new(db),
            environment: config.server.environment.clone(),
            editor_key: Arc::from(config.security.dev_editor_key.as_str()),
        }
    }
}

/// Assign correlation ids and echo them on the response.
pub async fn correlation_middleware(req: Request<Body>, next: Next) -> Response {
    let incoming = req
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok());
    let ids = RequestIds::from_incoming(incoming);

    let span = tracing::info_span!(
        "request",
        correlation_id = %ids.correlation_id,
        request_id = %ids.request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let correlation_id = ids.correlation_id.clone();
    let request_id = ids.request_id.clone();
    let mut response = correlation::scope(ids, next.run(req).instrument(span)).await;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        headers.insert(CORRELATION_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Reject editor requests without the configured key.
pub async fn editor_guard(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let authorized = req
        .headers()
        .get(EDITOR_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| key == &*state.editor_key);

    if !authorized {
        tracing::warn!(path = %req.uri().path(), "Rejected editor request");
        return AppError::Forbidden("Forbidden: invalid editor key".to_string()).into_response();
    }

    next.run(req).await
}
