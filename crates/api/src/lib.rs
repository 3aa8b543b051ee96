//! HTTP API layer for the help center backend.
//!
//! This crate provides the editor REST API:
//!
//! - **Endpoints**: CRUD for categories, guides, media and feedback under
//!   `/dev-editor`, plus the public `/health` probe
//! - **Extractors**: JSON bodies, ids and query strings mapped onto the
//!   uniform error envelope
//! - **Middleware**: Correlation ids and the editor-key guard
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, EDITOR_KEY_HEADER, correlation_middleware, editor_guard};
