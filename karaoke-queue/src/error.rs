//! Error types for karaoke-queue

use crate::queue::QueueError;
use thiserror::Error;

/// Main error type for the queue service
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected queue operation
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Catalog, database or I/O failure from the shared library
    #[error(transparent)]
    Common(#[from] karaoke_common::Error),

    /// HTTP server errors
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
