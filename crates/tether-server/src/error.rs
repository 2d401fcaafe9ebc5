//! API error type
//!
//! Each kind maps to its own status code so a caller can tell an auth
//! failure from a bad query from an unavailable store.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use tether_core::StorageError;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No `Authorization` header, or one without the `Bearer ` scheme
    #[error("Missing/invalid token")]
    MissingCredential,
    /// Bearer token present but wrong
    #[error("Forbidden")]
    InvalidCredential,
    /// FTS5 rejected the search query
    #[error("Malformed search query: {0}")]
    QuerySyntax(String),
    /// Request body, query string or path failed to parse
    #[error("{detail}")]
    InvalidRequest { status: StatusCode, detail: String },
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Storage unavailable")]
    Storage(#[source] StorageError),
    #[error("Internal error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredential => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredential => StatusCode::FORBIDDEN,
            ApiError::QuerySyntax(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidRequest { status, .. } => *status,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::QuerySyntax(msg) => ApiError::QuerySyntax(msg),
            other => ApiError::Storage(other),
        }
    }
}

macro_rules! impl_from_rejection {
    ($($rejection:ty),*) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::InvalidRequest {
                        status: rejection.status(),
                        detail: rejection.body_text(),
                    }
                }
            }
        )*
    };
}

impl_from_rejection!(JsonRejection, QueryRejection, PathRejection);

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage(cause) => error!("Storage operation failed: {}", cause),
            ApiError::Internal(cause) => error!("Request task failed: {}", cause),
            _ => {}
        }

        let body = serde_json::json!({ "detail": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
