//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Any failure coming out of a gateway. Only the message is meaningful to callers;
/// the variant records where it came from so the HTTP layer can pick a status.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("validation: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("constraint: {0}")]
    Constraint(String),
    #[error("decode: {0}")]
    Decode(String),
}

impl StoreError {
    /// Human-readable message stored in the container's `error` field.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Store(e) => match e {
                StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                StoreError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
                StoreError::Constraint(_) => (StatusCode::CONFLICT, "conflict"),
                StoreError::Db(sqlx::Error::RowNotFound) => (StatusCode::NOT_FOUND, "not_found"),
                StoreError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
                StoreError::Decode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "decode_error"),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
