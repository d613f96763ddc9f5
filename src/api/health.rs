//! Liveness endpoint

use axum::http::StatusCode;

/// Returns 200 with an empty body while the process is serving
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
