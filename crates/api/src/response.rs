//! API response types.

#![allow(missing_docs)]

use serde::Serialize;

/// `{"detail": ...}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: &'static str,
}

impl DetailResponse {
    #[must_use]
    pub const fn new(detail: &'static str) -> Self {
        Self { detail }
    }
}

/// `{"message": ...}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// A single URL.
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub url: String,
}

/// Health probe body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
}
