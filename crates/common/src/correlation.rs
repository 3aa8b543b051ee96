//! Request correlation identifiers.
//!
//! The HTTP layer scopes each request in [`scope`]; anything running inside
//! that future (services, error rendering, GraphQL resolvers) can read the
//! identifiers back through [`current`] without threading them through every
//! signature.

use std::future::Future;

use uuid::Uuid;

/// Header carrying the caller-supplied or generated correlation id.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Identifiers attached to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIds {
    /// Correlation id, propagated from the caller when present.
    pub correlation_id: String,
    /// Request id, always generated by this service.
    pub request_id: String,
}

impl RequestIds {
    /// Build ids for a request, reusing an incoming correlation id if it is usable.
    #[must_use]
    pub fn from_incoming(correlation_id: Option<&str>) -> Self {
        let correlation_id = correlation_id
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= 128)
            .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);

        Self {
            correlation_id,
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

tokio::task_local! {
    static REQUEST_IDS: RequestIds;
}

/// Run `fut` with `ids` as the current request identifiers.
pub async fn scope<F: Future>(ids: RequestIds, fut: F) -> F::Output {
    REQUEST_IDS.scope(ids, fut).await
}

/// The correlation id of the request being served, if any.
#[must_use]
pub fn current() -> Option<String> {
    REQUEST_IDS
        .try_with(|ids| ids.correlation_id.clone())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incoming_id_is_reused() {
        let ids = RequestIds::from_incoming(Some("abc-123"));
        assert_eq!(ids.correlation_id, "abc-123");
        assert_ne!(ids.request_id, "abc-123");
    }

    #[test]
    fn test_blank_incoming_id_is_replaced() {
        let ids = RequestIds::from_incoming(Some("   "));
        assert_eq!(ids.correlation_id.len(), 36);
    }

    #[tokio::test]
    async fn test_scope_exposes_ids() {
        assert!(current().is_none());

        let ids = RequestIds::from_incoming(Some("corr"));
        let seen = scope(ids, async { current() }).await;
        assert_eq!(seen.as_deref(), Some("corr"));
    }
}
