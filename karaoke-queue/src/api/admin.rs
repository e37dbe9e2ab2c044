//! Moderator endpoints
//!
//! Everything here sits behind [`super::auth::moderator_auth`] and bypasses
//! admission policy.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Duration;
use karaoke_common::db::get_song_by_id;
use karaoke_common::ResolvedSong;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::queue::{EntryRequest, SecondsResponse};
use crate::queue::{PolicyConfig, QueueEntry};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from: usize,
    pub to: usize,
}

/// Duration as entered by the moderator; missing parts are zero
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DurationRequest {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl DurationRequest {
    fn to_duration(&self) -> Result<Duration, ApiError> {
        let total = self
            .hours
            .checked_mul(3600)
            .and_then(|h| self.minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(self.seconds))
            .ok_or_else(|| ApiError::BadRequest("duration is too large".to_string()))?;
        Duration::try_seconds(total)
            .ok_or_else(|| ApiError::BadRequest("duration is too large".to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenState {
    pub open: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountValue {
    pub value: i64,
}

fn seconds(duration: Duration) -> Json<SecondsResponse> {
    Json(SecondsResponse {
        seconds: duration.num_seconds(),
    })
}

// ============================================================================
// Queue mutations
// ============================================================================

/// POST /admin/entries
pub async fn append_entry(
    State(state): State<AppState>,
    Json(request): Json<EntryRequest>,
) -> Result<(StatusCode, Json<QueueEntry>), ApiError> {
    let singer = request.singer()?;
    let found = get_song_by_id(&state.db, request.song_id).await?;
    let catalog = ResolvedSong::new(request.song_id, found);

    let entry = state
        .engine
        .moderator_append(request.song_id, singer, &catalog)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /admin/dequeue-first
pub async fn dequeue_first(State(state): State<AppState>) -> Result<Json<QueueEntry>, ApiError> {
    Ok(Json(state.engine.dequeue_first()?))
}

/// PUT /admin/dequeue/:index
pub async fn dequeue_at(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<QueueEntry>, ApiError> {
    Ok(Json(state.engine.dequeue_at(index)?))
}

/// DELETE /admin/entries/:index
pub async fn remove_entry(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<QueueEntry>, ApiError> {
    Ok(Json(state.engine.remove_at(index)?))
}

/// PUT /admin/move
pub async fn move_entry(
    State(state): State<AppState>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<Vec<QueueEntry>>, ApiError> {
    state.engine.move_to(request.from, request.to)?;
    Ok(Json(state.engine.snapshot().pending))
}

/// DELETE /admin/queue
pub async fn clear_queue(State(state): State<AppState>) -> StatusCode {
    state.engine.clear_pending();
    StatusCode::NO_CONTENT
}

/// DELETE /admin/processed
pub async fn clear_processed(State(state): State<AppState>) -> StatusCode {
    state.engine.clear_processed();
    StatusCode::NO_CONTENT
}

/// DELETE /admin/all
pub async fn clear_all(State(state): State<AppState>) -> StatusCode {
    state.engine.clear_all();
    StatusCode::NO_CONTENT
}

// ============================================================================
// Policy
// ============================================================================

/// GET /admin/policy
pub async fn get_policy(State(state): State<AppState>) -> Json<PolicyConfig> {
    Json(state.engine.policy())
}

pub async fn get_queue_open(State(state): State<AppState>) -> Json<OpenState> {
    Json(OpenState {
        open: state.engine.queue_is_open(),
    })
}

pub async fn set_queue_open(
    State(state): State<AppState>,
    Json(request): Json<OpenState>,
) -> Json<OpenState> {
    state.engine.set_queue_open(request.open);
    Json(request)
}

pub async fn get_time_between_same_song(State(state): State<AppState>) -> Json<SecondsResponse> {
    seconds(state.engine.time_between_same_song())
}

pub async fn set_time_between_same_song(
    State(state): State<AppState>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<SecondsResponse>, ApiError> {
    state
        .engine
        .set_time_between_same_song(request.to_duration()?)?;
    Ok(seconds(state.engine.time_between_same_song()))
}

pub async fn get_max_times_song_can_be_sung(State(state): State<AppState>) -> Json<CountValue> {
    Json(CountValue {
        value: state.engine.max_times_song_can_be_sung(),
    })
}

pub async fn set_max_times_song_can_be_sung(
    State(state): State<AppState>,
    Json(request): Json<CountValue>,
) -> Result<Json<CountValue>, ApiError> {
    state.engine.set_max_times_song_can_be_sung(request.value)?;
    Ok(Json(request))
}

pub async fn get_time_between_submissions(State(state): State<AppState>) -> Json<SecondsResponse> {
    seconds(state.engine.time_between_submissions())
}

pub async fn set_time_between_submissions(
    State(state): State<AppState>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<SecondsResponse>, ApiError> {
    state
        .engine
        .set_time_between_submissions(request.to_duration()?)?;
    Ok(seconds(state.engine.time_between_submissions()))
}
