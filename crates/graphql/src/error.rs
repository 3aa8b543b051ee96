//! Mapping of service errors onto GraphQL errors.

use async_graphql::{Error, ErrorExtensions};
use helpcenter_common::{AppError, correlation};

/// Convert an [`AppError`], hiding server-side detail.
///
/// The code lands in `extensions.code`; validation errors also carry their
/// field list under `extensions.details`.
pub fn gql_error(err: AppError) -> Error {
    err.log();

    let details = err
        .details()
        .and_then(|d| serde_json::to_value(d).ok())
        .and_then(|v| async_graphql::Value::from_json(v).ok());

    Error::new(err.public_message()).extend_with(|_, ext| {
        ext.set("code", err.error_code());
        if let Some(details) = details {
            ext.set("details", details);
        }
        if let Some(correlation_id) = correlation::current() {
            ext.set("correlation_id", correlation_id);
        }
    })
}
