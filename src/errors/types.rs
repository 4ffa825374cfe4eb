//! Error type definitions for the listing service.
//!
//! Every storage error carries the name of the operation that failed, and
//! the top-level error maps onto an HTTP response, so a failure reads the
//! same in the logs and on the wire.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::MessageResponse;

/// Top-level application error, rendered to JSON via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Image store errors
    #[error(transparent)]
    ImageStore(#[from] ImageStoreError),

    /// Ingestion pipeline errors, wrapped with the operation name
    #[error("add_item failed: {message}")]
    Ingestion { message: String },

    /// Malformed-input errors, rejected before touching storage
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Resource not found errors
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },
}

/// Repository layer specific errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Storage query or connection failures, tagged with the operation
    #[error("{operation} failed: {message}")]
    QueryFailed {
        operation: &'static str,
        message: String,
    },
}

/// Image store specific errors
#[derive(Error, Debug)]
pub enum ImageStoreError {
    /// Requested filename fails the serving rules (`.jpg` suffix, plain
    /// filename with no path components); raised before any filesystem
    /// access.
    #[error("invalid image path: {name}")]
    InvalidFilename { name: String },

    /// Filesystem failures, tagged with the operation
    #[error("{operation} failed: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Wrap an ingestion step failure with the ingest operation's name
    pub fn ingestion(source: impl std::fmt::Display) -> Self {
        Self::Ingestion {
            message: source.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::ImageStore(ImageStoreError::InvalidFilename { .. }) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl RepositoryError {
    /// Create a query failed error for the named operation
    pub fn query_failed(operation: &'static str, message: impl Into<String>) -> Self {
        Self::QueryFailed {
            operation,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(MessageResponse {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
