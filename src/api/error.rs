//! API error type and response mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Database connection still pending or failed; the bootstrap does not
    /// wait for it, so handlers must tolerate its absence.
    #[error("database unavailable")]
    DatabaseUnavailable,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("email already subscribed")]
    DuplicateEmail,

    #[error("{0}")]
    InvalidInput(String),

    #[error("internal error")]
    Internal(#[source] DbError),
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::DuplicateEmail => ApiError::DuplicateEmail,
            other => ApiError::Internal(other),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref e) = self {
            tracing::error!(error = %e, "API handler error");
        }
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
