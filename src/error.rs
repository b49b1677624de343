//! Error types for the link service
//!
//! Storage backends report [`StoreError`]; everything that can end an HTTP
//! request early is an [`AppError`]. Admin API failures are [`ApiError`]s,
//! which never become HTTP errors: the admin handler folds them into the
//! JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failure reported by a key-value backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// The embedded redb database failed
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    /// The backend could not serve the operation at all
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure while executing an admin API action
#[derive(Debug, Error)]
pub enum ApiError {
    /// The POST body is not a JSON admin request
    #[error("invalid request body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Request-level failures
#[derive(Debug, Error)]
pub enum AppError {
    /// `ADMIN_PATH` is missing or too short to resist guessing
    #[error("Security Error: ADMIN_PATH environment variable must be at least 64 characters long.")]
    InsecureAdminPath,

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored payload could not be decoded while resolving a slug
    #[error("corrupt record for slug '{slug}': {source}")]
    CorruptRecord {
        slug: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored destination cannot be sent as a `Location` header
    #[error("destination of slug '{0}' is not a valid header value")]
    InvalidDestination(String),

    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InsecureAdminPath => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
            other => {
                error!("request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
