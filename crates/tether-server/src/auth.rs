//! Bearer token authentication
//!
//! A missing or non-Bearer `Authorization` header and a wrong token are
//! reported as different errors (401 vs 403).

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Compare two secrets without short-circuiting on the first mismatch
fn constant_time_eq(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    if a_bytes.len() != b_bytes.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a_bytes.iter().zip(b_bytes.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Validate the `Authorization` header against the configured secret
pub fn check_bearer(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or(ApiError::MissingCredential)?;

    if constant_time_eq(token, expected) {
        Ok(())
    } else {
        Err(ApiError::InvalidCredential)
    }
}

/// Middleware guarding every data route
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(err) = check_bearer(request.headers(), &state.config.api_key) {
        tracing::debug!(path = %request.uri().path(), "Rejected request: {}", err);
        return Err(err);
    }
    Ok(next.run(request).await)
}
