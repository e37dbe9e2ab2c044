//! # Karaoke Common Library
//!
//! Shared code for the karaoke queue service including:
//! - Song catalog types and the SQLite catalog
//! - Configuration loading
//! - Clock abstraction and timestamp utilities
//! - Human-readable duration formatting

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod human_time;
pub mod time;

pub use catalog::{InMemoryCatalog, NewSong, ResolvedSong, SongId, SongRef, SongRepository};
pub use error::{Error, Result};
pub use time::{Clock, ManualClock, SystemClock};
