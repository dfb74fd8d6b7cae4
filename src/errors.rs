use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

use crate::store::StoreError;

/// Everything that can go wrong while answering an api request.
///
/// Each variant maps to exactly one http status, so the handlers never
/// build error responses by hand.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid field '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("gear not found: {0}")]
    GearNotFound(String),

    #[error("database is not available!")]
    StorageUnavailable,

    #[error("database error: {0}")]
    Storage(String),
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unavailable => ApiError::StorageUnavailable,
            StoreError::Backend(error) => ApiError::Storage(error.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::GearNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StorageUnavailable => StatusCode::BAD_GATEWAY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
