//! Song catalog types
//!
//! The queue engine never owns catalog data: it receives [`SongRef`] values
//! from a [`SongRepository`] and compares them by [`SongId`].

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Catalog identity of a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub i64);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog song as seen by the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRef {
    pub id: SongId,
    pub title: String,
    pub artist: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,

    /// Playback length in milliseconds, if the import job could determine it
    #[serde(default)]
    pub duration_ms: Option<i64>,
}

impl SongRef {
    pub fn new(id: i64, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: SongId(id),
            title: title.into(),
            artist: artist.into(),
            lyrics: None,
            duration_ms: None,
        }
    }

    /// Builder-style helper setting the known playback length
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.num_milliseconds());
        self
    }

    /// Known playback length; negative stored values count as unknown
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms
            .filter(|ms| *ms >= 0)
            .map(Duration::milliseconds)
    }

    /// Same catalog song, regardless of which copy we hold
    pub fn same_song(&self, other: &SongRef) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for SongRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.artist)
    }
}

/// Data for a song that is not yet in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<i64>,
}

/// Synchronous song lookup used by the admission path
///
/// Implementations must not perform I/O: the engine calls this while holding
/// its lock. Asynchronous catalogs resolve first and hand over a
/// [`ResolvedSong`].
pub trait SongRepository {
    fn song_by_id(&self, id: SongId) -> Option<SongRef>;
}

/// Result of a lookup that already happened elsewhere (e.g. in SQLite)
#[derive(Debug, Clone)]
pub struct ResolvedSong {
    requested: SongId,
    found: Option<SongRef>,
}

impl ResolvedSong {
    pub fn new(requested: SongId, found: Option<SongRef>) -> Self {
        Self { requested, found }
    }
}

impl SongRepository for ResolvedSong {
    fn song_by_id(&self, id: SongId) -> Option<SongRef> {
        if id != self.requested {
            return None;
        }
        self.found.clone()
    }
}

/// Catalog held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    songs: HashMap<SongId, SongRef>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a song
    pub fn insert(&mut self, song: SongRef) {
        self.songs.insert(song.id, song);
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

impl FromIterator<SongRef> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = SongRef>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for song in iter {
            catalog.insert(song);
        }
        catalog
    }
}

impl SongRepository for InMemoryCatalog {
    fn song_by_id(&self, id: SongId) -> Option<SongRef> {
        self.songs.get(&id).cloned()
    }
}
