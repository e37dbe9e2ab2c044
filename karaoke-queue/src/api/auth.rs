//! Moderator authentication middleware
//!
//! Moderator routes require `Authorization: Bearer <token>` matching the
//! configured moderator token. With no token configured, auth is disabled.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::AppState;

/// Applied to the moderator router only; public routes never see it.
pub async fn moderator_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(expected) = state.moderator_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);

    let outcome = match provided {
        None => Err(AuthError::MissingToken),
        Some(token) if !tokens_match(token, expected) => Err(AuthError::InvalidToken),
        Some(_) => Ok(()),
    };

    if let Err(e) = outcome {
        warn!("Rejected moderator request to {}: {:?}", request.uri(), e);
        return Err(e);
    }
    Ok(next.run(request).await)
}

/// Token from an `Authorization` value; the scheme name is case-insensitive
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("Bearer").then(|| token.trim())
}

/// Compares every byte regardless of where the first mismatch is
fn tokens_match(provided: &str, expected: &str) -> bool {
    let (provided, expected) = (provided.as_bytes(), expected.as_bytes());
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing bearer token",
            AuthError::InvalidToken => "Invalid bearer token",
        };

        let body = Json(json!({
            "error": "unauthorized",
            "detail": message,
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
