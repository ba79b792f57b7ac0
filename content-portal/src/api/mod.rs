pub mod content_transfer;
mod dtos;
mod error;
pub mod publication;

pub use error::ApiError;

use actix_web::HttpRequest;
use uuid::Uuid;

/// Caller identity, asserted upstream by the portal's session layer.
pub(crate) fn user_id(req: &HttpRequest) -> Result<Uuid, ApiError> {
    let raw = req
        .headers()
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidRequest {
            error_description: "missing X-User-Id header".to_string(),
        })?;
    raw.parse().map_err(|_| ApiError::InvalidRequest {
        error_description: format!("X-User-Id isn't a uuid: {raw}"),
    })
}
