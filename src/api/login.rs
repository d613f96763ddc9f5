//! Account registration and login endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

pub fn create_login_router() -> Router<AppState> {
    Router::new()
        .route("/login/add", post(add_login))
        .route("/login", post(login))
}

/// Credentials posted to both endpoints
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Register a new account
///
/// POST /login/add
pub async fn add_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<StatusCode, ApiError> {
    let id = state
        .login_service
        .add_login(&request.username, &request.password)
        .await
        .map_err(|e| {
            warn!(error.kind = %e.kind(), error = %e, "Failed to add login");
            ApiError::from(e)
        })?;

    info!(record_id = %id, "Account registered");
    Ok(StatusCode::OK)
}

/// Exchange credentials for a bearer token
///
/// POST /login
///
/// The token is returned as the raw response body.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    let verification = state
        .login_service
        .validate(&request.username, &request.password)
        .await?;

    if !verification.matched {
        info!("Login rejected");
        return Err(ApiError::forbidden("Invalid username or password"));
    }

    let token = state.token_service.issue_for_user(&request.username).await?;

    info!(record_id = %verification.record_id, "Login succeeded");
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], token))
}
