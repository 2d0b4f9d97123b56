//! Error types shared by the data access layer and the route handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::upload::UploadError;

/// Failure reported by the songs store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Used by non-SQL stores
    #[error("Store error: {0}")]
    Other(String),
}

/// Terminal failure of a request. Rendered as a plain-text status response.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Error uploading image: {0}")]
    Upload(#[from] UploadError),
}

impl AppError {
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Store { message, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Store { message, source } => {
                error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            // A broken multipart body is the client's fault
            AppError::Upload(UploadError::Multipart(e)) => e.into_response(),
            AppError::Upload(UploadError::Io(e)) => {
                error!("Error uploading image: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error uploading image").into_response()
            }
        }
    }
}
