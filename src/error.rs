//! Error types for the pastebin
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

// == Store Error Enum ==
/// Failures raised by a paste store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network or socket failure talking to the cache server
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cache server answered with something we could not parse
    #[error("cache protocol error: {0}")]
    Protocol(String),

    /// The cache server reported an error
    #[error("cache server error: {0}")]
    Server(String),

    /// Key cannot be stored by this backend
    #[error("invalid cache key: {0:?}")]
    InvalidKey(String),

    /// Value does not fit in the store at all
    #[error("value of {size} bytes exceeds the {limit} byte limit")]
    ValueTooLarge { size: usize, limit: usize },
}

/// Convenience Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Api Error Enum ==
/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unknown paste identifier or route
    #[error("Not Found")]
    NotFound,

    /// Submitted paste is over the size cap
    #[error("Content Length Must Be Less Than {}KB", .limit / 1024)]
    PayloadTooLarge { limit: usize },

    /// Every identifier candidate collided
    #[error("You Overwhelmed The Randomness")]
    Overwhelmed,

    /// Neither `text` nor `file` was submitted
    #[error("Missing text Or file Field")]
    MissingContent,

    /// The request body could not be extracted
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Backend failure
    #[error("Internal Server Error")]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Overwhelmed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingContent => StatusCode::BAD_REQUEST,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Store(source) => {
                error!("paste store failure: {source}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

impl From<axum::extract::rejection::FormRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::FormRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<axum::extract::multipart::MultipartRejection> for ApiError {
    fn from(rejection: axum::extract::multipart::MultipartRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(source: axum::extract::multipart::MultipartError) -> Self {
        ApiError::Rejected {
            status: source.status(),
            message: source.body_text(),
        }
    }
}

impl ApiError {
    /// Reports a body-limit rejection as an oversized paste so every
    /// oversized submission gets the same message.
    pub fn payload_limited(self, limit: usize) -> Self {
        match self {
            ApiError::Rejected { status, .. } if status == StatusCode::PAYLOAD_TOO_LARGE => {
                ApiError::PayloadTooLarge { limit }
            }
            other => other,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
