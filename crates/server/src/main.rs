//! Help center server entry point.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, header},
    middleware,
    response::{IntoResponse, Response},
};
use helpcenter_api::{AppState, EDITOR_KEY_HEADER, correlation_middleware};
use helpcenter_common::config::StorageKind;
use helpcenter_common::correlation::{CORRELATION_ID_HEADER, REQUEST_ID_HEADER};
use helpcenter_common::{AppError, Config, storage};
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir, trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.is_json() || config.server.environment == "production" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Panics still answer with the uniform error envelope.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::Internal(format!("Handler panicked: {detail}")).into_response()
}

/// CORS policy from `ALLOWED_ORIGINS`.
///
/// A `*` entry allows any origin; credentials are only allowed with an
/// explicit origin list.
fn cors_layer(config: &Config) -> CorsLayer {
    let configured = config.server.allowed_origin_list();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(EDITOR_KEY_HEADER),
            HeaderName::from_static(CORRELATION_ID_HEADER),
        ])
        .expose_headers([
            HeaderName::from_static(CORRELATION_ID_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ]);

    if configured.iter().any(|origin| origin == "*") {
        tracing::warn!("CORS allows any origin; credentials disabled");
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = configured
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(origins).allow_credentials(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first; the log filter depends on it
    let config = Config::load()?;
    init_tracing(&config);

    info!(environment = %config.server.environment, "Starting help center server...");

    // Connect to database
    let db = helpcenter_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    helpcenter_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);
    let media_storage = storage::from_settings(&config.storage);
    info!(backend = ?config.storage.backend, "Media storage ready");

    let state = AppState::new(Arc::clone(&db), media_storage, &config);
    let schema = helpcenter_graphql::build_schema(db);

    let mut app = Router::new()
        .merge(helpcenter_api::router(state))
        .merge(helpcenter_graphql::router(schema));

    let files_path = config.storage.base_url.trim_end_matches('/');
    if config.storage.backend == StorageKind::Local && files_path.starts_with('/') {
        app = app.nest_service(
            files_path,
            ServeDir::new(&config.storage.base_path),
        );
    }

    let max_body = config.server.max_body_bytes;
    let app = app
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(cors_layer(&config))
        .layer(middleware::from_fn(correlation_middleware))
        .layer(TraceLayer::new_for_http());

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    async fn preflight(allowed_origins: &str, origin: &str) -> Response {
        let mut config = Config::for_tests("postgres://localhost/unused");
        config.server.allowed_origins = allowed_origins.to_string();

        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .layer(cors_layer(&config));

        app.oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/health")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_wildcard_origin_allows_any_without_credentials() {
        let response = preflight("*", "https://docs.example.com").await;

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_listed_origin_allows_credentials() {
        let response = preflight(
            "http://localhost:3000, https://docs.example.com",
            "https://docs.example.com",
        )
        .await;

        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://docs.example.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }
}
