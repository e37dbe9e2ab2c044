//! HTTP error responses
//!
//! The only place where queue error kinds become status codes.

use crate::queue::QueueError;
use crate::Error;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error returned by every handler
#[derive(Debug)]
pub enum ApiError {
    /// Failure from the engine, catalog or database
    Service(Error),

    /// Malformed request the engine never saw
    BadRequest(String),
}

impl<E> From<E> for ApiError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        ApiError::Service(err.into())
    }
}

fn queue_status(err: &QueueError) -> StatusCode {
    match err {
        QueueError::QueueClosed => StatusCode::FORBIDDEN,
        QueueError::SubmissionTooSoon { .. } => StatusCode::TOO_MANY_REQUESTS,
        QueueError::SongNotFound { .. } => StatusCode::NOT_FOUND,
        QueueError::SongAlreadyQueued { .. }
        | QueueError::SongExhausted { .. }
        | QueueError::SongTooRecent { .. } => StatusCode::CONFLICT,
        QueueError::QueueEmpty | QueueError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
        QueueError::InvalidDuration { .. } | QueueError::InvalidCount { .. } => {
            StatusCode::BAD_REQUEST
        }
    }
}

fn common_status(err: &karaoke_common::Error) -> (StatusCode, &'static str) {
    use karaoke_common::Error as Common;
    match err {
        Common::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        Common::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
        Common::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database"),
        Common::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io"),
        Common::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, detail, retry_after) = match &self {
            ApiError::Service(Error::Queue(err)) => {
                let retry_after = match err {
                    QueueError::SubmissionTooSoon { retry_after } => {
                        Some(retry_after.num_seconds().max(0))
                    }
                    _ => None,
                };
                (queue_status(err), err.kind(), err.to_string(), retry_after)
            }
            ApiError::Service(Error::Common(err)) => {
                let (status, kind) = common_status(err);
                (status, kind, err.to_string(), None)
            }
            ApiError::Service(err @ Error::Http(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                err.to_string(),
                None,
            ),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None)
            }
        };

        if status.is_server_error() {
            error!("Request failed: {}", detail);
        }

        let body = Json(json!({
            "error": kind,
            "detail": detail,
        }));

        let mut response = (status, body).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
