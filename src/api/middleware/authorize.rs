//! Bearer token gate for protected routes

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Reject requests without a valid bearer token
///
/// Missing or badly formed headers get 401, tokens that fail verification
/// get 403. On success the verified `TokenClaims` are placed in the request
/// extensions.
pub async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;

    let claims = state.token_service.verify_token(&token).await.map_err(|e| {
        warn!(
            path = %request.uri().path(),
            error.kind = %e.kind(),
            error = %e,
            "Token verification failed"
        );
        ApiError::forbidden("Invalid or expired token").with_code(e.kind().as_str())
    })?;

    debug!(username = ?claims.username(), "Request authorized");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Pull the token out of `Authorization: Bearer <token>`
///
/// The token must be a single non-empty segment.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let value = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header encoding"))?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| ApiError::unauthorized("Expected 'Authorization: Bearer <token>'"))?;

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(ApiError::unauthorized(
            "Expected 'Authorization: Bearer <token>'",
        ));
    }

    Ok(token.to_string())
}
