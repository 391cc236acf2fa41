//! Error types.
//!
//! Two families live here. [`Error`] covers infrastructure failures that stop
//! a service from running: binding a port, reading configuration, reaching
//! the database. [`ApiError`] is the closed set of failures a handler reports
//! to a client; it renders itself as a [`Response`](crate::Response).

use http::StatusCode;
use serde_json::json;
use tracing::error;

use crate::response::{IntoResponse, Json, Response};

/// The error type returned by crudsvc's fallible startup operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{addr}`: {source}")]
    Addr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("database unreachable after {attempts} attempts: {source}")]
    DatabaseUnreachable {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },
}

/// A failure reported back to the HTTP client.
///
/// The rendered body is fixed per variant. [`ApiError::Internal`] carries the
/// underlying detail for the log only; the client sees a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid id")]
    InvalidId,

    #[error("invalid title")]
    InvalidTitle,

    #[error("invalid body")]
    InvalidBody,

    /// `400` with an empty body.
    #[error("bad request")]
    BadRequest,

    #[error("task not found")]
    TaskNotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId | Self::InvalidTitle | Self::InvalidBody | Self::BadRequest => {
                StatusCode::BAD_REQUEST
            }
            Self::TaskNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::BadRequest => Response::status(status),
            Self::Internal(detail) => {
                error!(%detail, "request failed");
                (status, Json(json!({ "error": "internal error" }))).into_response()
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}
