//! Song catalog persistence (SQLite)

pub mod init;
pub mod songs;

pub use init::*;
pub use songs::*;
