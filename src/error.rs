//! Error types for the UTM builder
//!
//! Nothing in the core is fatal: these errors are either logged and swallowed
//! (storage, composition) or turned into JSON responses at the HTTP edge.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure while reading or writing the key-value substrate
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] redb::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a composed URL came out empty
///
/// `compose` collapses both variants into an empty string; `compose_checked`
/// keeps them apart for diagnostics.
#[derive(Error, Debug, PartialEq)]
pub enum ComposeError {
    #[error("no website URL yet")]
    Empty,
    #[error("malformed website URL: {0}")]
    Malformed(#[from] url::ParseError),
}

/// Returned by `Session::commit` when there is no usable URL to record
#[derive(Error, Debug, PartialEq)]
pub enum CommitError {
    #[error("Generate a valid URL first")]
    NothingToCommit,
}

/// Errors surfaced by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Commit(#[from] CommitError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::UnknownField(_) => (StatusCode::BAD_REQUEST, "unknown_field"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Commit(CommitError::NothingToCommit) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "nothing_to_commit")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        (
            status,
            Json(json!({
                "error": self.to_string(),
                "code": code
            })),
        )
            .into_response()
    }
}
