//! Shared application state

use crate::queue::QueueEngine;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The one queue engine of this process
    pub engine: Arc<QueueEngine>,

    /// Song catalog
    pub db: SqlitePool,

    /// Bearer token for moderator routes; `None` disables moderator auth
    pub moderator_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(engine: Arc<QueueEngine>, db: SqlitePool, moderator_token: Option<String>) -> Self {
        Self {
            engine,
            db,
            moderator_token: moderator_token.map(Arc::from),
        }
    }
}
