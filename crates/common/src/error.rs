//! Error types for the help center backend.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::correlation;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Message returned to clients for any 5xx error.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Message used for every duplicate slug rejection.
pub const SLUG_CONFLICT_MESSAGE: &str = "Slug already exists";

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `body.blocks[0].level`.
    pub field: String,
    /// Human readable reason.
    pub message: String,
    /// The rejected value, or `null` when it was absent.
    pub value: Value,
    /// Machine readable reason code.
    pub code: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Value,
        code: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value,
            code: code.into(),
        }
    }

    /// Build from a `validator` error reported against `field`.
    pub fn from_validation(field: impl Into<String>, err: &validator::ValidationError) -> Self {
        Self::new(
            field,
            err.message
                .as_ref()
                .map_or_else(|| err.code.to_string(), ToString::to_string),
            err.params.get("value").cloned().unwrap_or(Value::Null),
            err.code.to_string(),
        )
    }
}

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("{0}")]
    NotFound(String),

    #[error("Input validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    // === Server Errors ===
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a validation error with a single field.
    pub fn invalid_field(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Value,
        code: impl Into<String>,
    ) -> Self {
        Self::Validation(vec![FieldError::new(field, message, value, code)])
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// The message safe to show to a client.
    ///
    /// Server errors never leak their internal description.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Field details for validation errors.
    #[must_use]
    pub fn details(&self) -> Option<&[FieldError]> {
        match self {
            Self::Validation(details) => Some(details),
            _ => None,
        }
    }

    /// Log this error with the current correlation id.
    pub fn log(&self) {
        let correlation_id = correlation::current().unwrap_or_default();
        let code = self.error_code();
        if self.is_server_error() {
            tracing::error!(error = %self, code, %correlation_id, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code, %correlation_id, "Client error occurred");
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldError]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let body = Json(ErrorEnvelope {
            error: ErrorBody {
                code: self.error_code(),
                message: self.public_message(),
                details: self.details(),
                correlation_id: correlation::current(),
            },
        });

        (self.status_code(), body).into_response()
    }
}

/// Translate a database error.
///
/// Unique constraint violations become [`AppError::Conflict`]; the only unique
/// user-facing columns in the schema are slugs.
#[must_use]
pub fn db_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(SLUG_CONFLICT_MESSAGE.to_string())
        }
        _ => AppError::Database(err.to_string()),
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(field_errors(&errors))
    }
}

/// Flatten derive-validator output into field errors, sorted by field.
#[must_use]
pub fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(move |e| FieldError::from_validation(field.to_string(), e))
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        db_err(err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Validation(vec![]).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Storage("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_message_hides_internals() {
        let err = AppError::Database("relation \"category\" does not exist".into());
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);

        let err = AppError::Conflict(SLUG_CONFLICT_MESSAGE.into());
        assert_eq!(err.public_message(), "Slug already exists");
    }

    #[test]
    fn test_from_validation_errors() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("too long".into());
        err.add_param("value".into(), &"abc");
        errors.add("name", err);

        let app_err = AppError::from(errors);
        let details = app_err.details().unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "name");
        assert_eq!(details[0].code, "length");
        assert_eq!(details[0].message, "too long");
        assert_eq!(details[0].value, json!("abc"));
    }

    #[test]
    fn test_db_err_generic_is_database() {
        let err = db_err(DbErr::Custom("boom".into()));
        assert!(matches!(err, AppError::Database(_)));
    }
}
