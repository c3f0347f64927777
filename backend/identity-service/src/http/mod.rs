/// HTTP API for the identity service
///
/// - `POST  /v1/auth/register`
/// - `POST  /v1/auth/login`
/// - `PATCH /v1/auth/role` (requires `Authorization: Bearer <token>`)
/// - `GET   /health`
mod handlers;
mod middleware;
mod response;

pub use response::ApiResponse;

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::security::TokenIssuer;
use crate::services::IdentityService;

/// Shared HTTP server state
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
    pub tokens: TokenIssuer,
}

/// Build the HTTP router.
///
/// Requests exceeding `request_timeout` are answered with 408; the handler
/// future, and any store or cache call it is awaiting, is dropped.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let protected = Router::new()
        .route("/v1/auth/role", patch(handlers::update_role))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::require_bearer,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/v1/auth/register", post(handlers::register))
        .route("/v1/auth/login", post(handlers::login))
        .merge(protected)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint (no auth required)
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Start the HTTP server and run until `shutdown` resolves
pub async fn start_http_server<F>(
    addr: SocketAddr,
    router: Router,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
