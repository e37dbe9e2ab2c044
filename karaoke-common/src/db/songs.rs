//! Song catalog queries

use crate::catalog::{NewSong, SongId, SongRef};
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

const SONG_COLUMNS: &str = "id, title, artist, lyrics, duration_ms";

fn song_from_row(row: &SqliteRow) -> SongRef {
    SongRef {
        id: SongId(row.get("id")),
        title: row.get("title"),
        artist: row.get("artist"),
        lyrics: row.get("lyrics"),
        duration_ms: row.get("duration_ms"),
    }
}

/// Look up a single song
pub async fn get_song_by_id(db: &SqlitePool, id: SongId) -> Result<Option<SongRef>> {
    let row = sqlx::query(&format!("SELECT {} FROM songs WHERE id = ?", SONG_COLUMNS))
        .bind(id.0)
        .fetch_optional(db)
        .await?;

    Ok(row.as_ref().map(song_from_row))
}

/// All songs, ordered by artist then title
pub async fn list_songs(db: &SqlitePool) -> Result<Vec<SongRef>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM songs ORDER BY artist, title",
        SONG_COLUMNS
    ))
    .fetch_all(db)
    .await?;

    Ok(rows.iter().map(song_from_row).collect())
}

/// Songs matching an exact title and/or artist
///
/// With neither criterion this is equivalent to [`list_songs`].
pub async fn find_songs(
    db: &SqlitePool,
    title: Option<&str>,
    artist: Option<&str>,
) -> Result<Vec<SongRef>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM songs \
         WHERE (?1 IS NULL OR title = ?1) AND (?2 IS NULL OR artist = ?2) \
         ORDER BY artist, title",
        SONG_COLUMNS
    ))
    .bind(title)
    .bind(artist)
    .fetch_all(db)
    .await?;

    Ok(rows.iter().map(song_from_row).collect())
}

/// Insert a song and return it with its assigned id
pub async fn add_song(db: &SqlitePool, song: &NewSong) -> Result<SongRef> {
    validate_new_song(song)?;

    let result = sqlx::query(
        "INSERT INTO songs (title, artist, lyrics, duration_ms) VALUES (?, ?, ?, ?)",
    )
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.lyrics)
    .bind(song.duration_ms)
    .execute(db)
    .await?;

    let id = SongId(result.last_insert_rowid());
    info!("Added song {} ({} by {})", id, song.title, song.artist);

    Ok(SongRef {
        id,
        title: song.title.clone(),
        artist: song.artist.clone(),
        lyrics: song.lyrics.clone(),
        duration_ms: song.duration_ms,
    })
}

fn validate_new_song(song: &NewSong) -> Result<()> {
    if song.title.trim().is_empty() {
        return Err(Error::InvalidInput("song title cannot be empty".to_string()));
    }
    if song.artist.trim().is_empty() {
        return Err(Error::InvalidInput("song artist cannot be empty".to_string()));
    }
    if matches!(song.duration_ms, Some(ms) if ms < 0) {
        return Err(Error::InvalidInput("song duration cannot be negative".to_string()));
    }
    Ok(())
}
