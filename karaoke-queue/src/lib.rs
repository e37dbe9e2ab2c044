//! # Karaoke Queue
//!
//! Admission and ordering engine for a karaoke night, plus the HTTP service
//! that exposes it to submitters and the moderator.
//!
//! - [`queue`]: the engine (store, policy, estimation, admission)
//! - [`api`]: axum handlers
//! - [`server`]: router assembly and serving

pub mod api;
pub mod error;
pub mod queue;
pub mod server;
pub mod state;

pub use error::{Error, Result};
pub use server::build_router;
pub use state::AppState;
