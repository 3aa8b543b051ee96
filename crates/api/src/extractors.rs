//! Request extractors.
//!
//! Axum's stock rejections answer with plain-text 400/415 bodies. These
//! wrappers turn malformed input into [`AppError::Validation`] so every client
//! error shares the same envelope.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request, rejection::JsonRejection},
    http::request::Parts,
};
use helpcenter_common::AppError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// JSON body whose syntax and shape errors become 422 responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(&rejection)),
        }
    }
}

fn json_rejection(rejection: &JsonRejection) -> AppError {
    let code = match rejection {
        JsonRejection::MissingJsonContentType(_) => "content_type",
        _ => "invalid_json",
    };
    AppError::invalid_field("body", rejection.body_text(), Value::Null, code)
}

/// Query string whose parse errors become 422 responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| {
                AppError::invalid_field("query", rejection.body_text(), Value::Null, "invalid_query")
            })
    }
}

/// A single `{id}` path segment parsed as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub Uuid);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        parse_id("id", &raw).map(Self)
    }
}

/// Parse a path identifier, reporting failures against `field`.
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| {
        AppError::invalid_field(
            field,
            "Invalid UUID",
            Value::String(raw.to_string()),
            "uuid_parsing",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("id", &id.to_string()).unwrap(), id);

        let err = parse_id("media_id", "nope").unwrap_err();
        let details = err.details().unwrap();
        assert_eq!(details[0].field, "media_id");
        assert_eq!(details[0].code, "uuid_parsing");
    }
}
