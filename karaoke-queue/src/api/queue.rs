//! Public queue endpoints: viewing the queue and submitting songs

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::AppendHeaders,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use karaoke_common::db::get_song_by_id;
use karaoke_common::{ResolvedSong, SongId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ApiError;
use crate::queue::{ProcessedEntry, QueueEntry};
use crate::AppState;

/// Cookie holding the submitter's cooldown anchor (RFC 3339)
pub const LAST_ADDED_COOKIE: &str = "last_added";

/// Shortest cookie lifetime in seconds
const LAST_ADDED_MIN_MAX_AGE: i64 = 24 * 60 * 60;

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub song_id: SongId,
    pub singer: String,
}

impl EntryRequest {
    /// Singer name with surrounding whitespace removed; empty is rejected
    pub(crate) fn singer(&self) -> Result<String, ApiError> {
        let singer = self.singer.trim();
        if singer.is_empty() {
            return Err(ApiError::BadRequest("singer cannot be empty".to_string()));
        }
        Ok(singer.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct SecondsResponse {
    pub seconds: i64,
}

/// GET /queue
pub async fn get_pending(State(state): State<AppState>) -> Json<Vec<QueueEntry>> {
    Json(state.engine.snapshot().pending)
}

/// GET /queue/processed
pub async fn get_processed(State(state): State<AppState>) -> Json<Vec<ProcessedEntry>> {
    Json(state.engine.snapshot().processed)
}

/// GET /queue/time-until-end
pub async fn get_time_until_end(State(state): State<AppState>) -> Json<SecondsResponse> {
    Json(SecondsResponse {
        seconds: state.engine.time_until_end_of_queue().num_seconds(),
    })
}

/// POST /queue/entries
///
/// Reads the cooldown anchor from the `last_added` cookie and refreshes it
/// on success. The catalog lookup happens before the engine is entered.
pub async fn submit_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<EntryRequest>,
) -> Result<
    (
        StatusCode,
        AppendHeaders<[(header::HeaderName, HeaderValue); 1]>,
        Json<QueueEntry>,
    ),
    ApiError,
> {
    let singer = request.singer()?;
    let last_submitted_at = last_added(&headers);

    let found = get_song_by_id(&state.db, request.song_id).await?;
    let catalog = ResolvedSong::new(request.song_id, found);

    let admission = state
        .engine
        .submit(request.song_id, singer, last_submitted_at, &catalog)?;

    let cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly",
        LAST_ADDED_COOKIE,
        admission.submitted_at.to_rfc3339(),
        last_added_max_age(state.engine.time_between_submissions())
    );
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|e| crate::Error::Http(format!("invalid cookie value: {}", e)))?;

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(admission.entry),
    ))
}

/// Cookie lifetime: at least a day, and never shorter than the cooldown it anchors
fn last_added_max_age(cooldown: Duration) -> i64 {
    cooldown.num_seconds().max(LAST_ADDED_MIN_MAX_AGE)
}

/// Cooldown anchor from the request cookies; unparseable values count as absent
fn last_added(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let value = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == LAST_ADDED_COOKIE)
        .map(|(_, value)| value.trim_matches('"'))?;

    match DateTime::parse_from_rfc3339(value) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(e) => {
            debug!("Ignoring malformed {} cookie: {}", LAST_ADDED_COOKIE, e);
            None
        }
    }
}
