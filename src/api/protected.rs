//! Endpoints behind the bearer token gate

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::api::middleware::authorize;
use crate::api::state::AppState;
use crate::infrastructure::auth::TokenClaims;

pub fn create_protected_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/testauth", get(test_auth))
        .route("/shutdown", post(shutdown))
        .route_layer(middleware::from_fn_with_state(state, authorize))
}

/// Succeeds for any holder of a valid token
///
/// GET /testauth
pub async fn test_auth(Extension(claims): Extension<TokenClaims>) -> StatusCode {
    info!(username = ?claims.username(), "Token accepted");
    StatusCode::OK
}

/// Ask the server to stop gracefully
///
/// POST /shutdown
pub async fn shutdown(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> StatusCode {
    info!(username = ?claims.username(), "Shutdown requested");
    state.shutdown.trigger();
    StatusCode::OK
}
