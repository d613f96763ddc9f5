//! JSON body extractor with API-shaped rejections

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON extractor that ignores `Content-Type` and rejects with 400
///
/// Clients of this service post bodies without a JSON content type, so the
/// raw bytes are parsed directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            ApiError::bad_request(format!("Failed to read request body: {}", e.body_text()))
                .with_code("body_read_error")
        })?;

        serde_json::from_slice(&bytes).map(Json).map_err(|e| {
            ApiError::bad_request(format!("Invalid JSON body: {}", e)).with_code("json_parse_error")
        })
    }
}
