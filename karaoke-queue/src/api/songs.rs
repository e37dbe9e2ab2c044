//! Song catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use karaoke_common::db::{add_song, find_songs, get_song_by_id, list_songs};
use karaoke_common::{NewSong, SongId, SongRef};
use serde::Deserialize;

use super::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SongSearch {
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// GET /songs
pub async fn get_songs(State(state): State<AppState>) -> Result<Json<Vec<SongRef>>, ApiError> {
    Ok(Json(list_songs(&state.db).await?))
}

/// GET /songs/search?title=&artist=
pub async fn search_songs(
    State(state): State<AppState>,
    Query(search): Query<SongSearch>,
) -> Result<Json<Vec<SongRef>>, ApiError> {
    let songs = find_songs(
        &state.db,
        search.title.as_deref(),
        search.artist.as_deref(),
    )
    .await?;
    Ok(Json(songs))
}

/// GET /songs/:id
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SongRef>, ApiError> {
    let song = get_song_by_id(&state.db, SongId(id))
        .await?
        .ok_or_else(|| karaoke_common::Error::NotFound(format!("song {}", id)))?;
    Ok(Json(song))
}

/// POST /admin/songs (moderator)
pub async fn create_song(
    State(state): State<AppState>,
    Json(song): Json<NewSong>,
) -> Result<(StatusCode, Json<SongRef>), ApiError> {
    let song = add_song(&state.db, &song).await?;
    Ok((StatusCode::CREATED, Json(song)))
}
