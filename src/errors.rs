use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::response::ApiResponse;

/// Request-scoped failures surfaced to API callers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DuplicateName(String),

    #[error("{0}")]
    CategoryNotFound(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Store or crypto failure. The message is logged, never sent to clients.
    #[error("Internal Server Error")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateName(_)
            | AppError::CategoryNotFound(_)
            | AppError::InvalidCredentials(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            log::error!("Internal error: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.to_string()))
    }
}

/// Failures reported by the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("duplicate key: {0}")]
    Conflict(String),

    #[error("store backend: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == 11000 => {
                StoreError::Conflict(write.message.clone())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            // The unique index on products.name is the backstop for the
            // check-then-insert race in the product service.
            StoreError::Conflict(_) => AppError::DuplicateName("Product name already exists".to_string()),
            StoreError::Backend(msg) => AppError::Internal(msg),
        }
    }
}
