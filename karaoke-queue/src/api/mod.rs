//! HTTP API handlers

pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod queue;
pub mod songs;

pub use auth::moderator_auth;
pub use error::ApiError;
pub use health::health_routes;
