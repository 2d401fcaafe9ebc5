//! HTTP API
//!
//! Data routes sit behind the bearer-token middleware; the UI and health
//! routes are public. CORS wraps everything so preflight requests never
//! reach the auth gate.

pub mod extract;
pub mod handlers;
pub mod static_files;

use axum::http::{header, HeaderValue};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};

use crate::auth;
use crate::config::Config;
use crate::state::AppState;

/// CORS policy from the configured origin list.
///
/// Credentials are allowed, which rules out literal wildcards, so "any
/// origin" mirrors the request origin instead.
fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match config.origins() {
        Some(origins) => {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse::<HeaderValue>() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", o);
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
        None => AllowOrigin::mirror_request(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Build the axum router with all routes
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/state/set", post(handlers::state_set))
        .route("/state/get", get(handlers::state_get))
        .route("/memory/add", post(handlers::memory_add))
        .route("/memory/search", get(handlers::memory_search))
        .route("/goals/add", post(handlers::goals_add))
        .route("/goals/progress", post(handlers::goals_progress))
        .route("/goals/{id}", get(handlers::goal_get))
        .route("/context/export", get(handlers::context_export))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    let public = Router::new()
        .route("/", get(static_files::serve_index))
        .route("/static/{*path}", get(static_files::serve_asset))
        .route("/health", get(handlers::health));

    let nosniff = SetResponseHeaderLayer::overriding(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&state.config))
                .layer(nosniff),
        )
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM
pub async fn serve(state: AppState) -> Result<(), std::io::Error> {
    let addr = state
        .config
        .bind_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Tether listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Tether server shutting down");
    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
