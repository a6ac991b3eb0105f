//! Error type shared by the catalog crates
//!
//! Covers what can fail below the HTTP layer: opening and migrating the
//! database, reading configuration, and row lookups. The server maps these
//! onto status codes in its own `ApiError`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Creating the database directory or reading a config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable config file or out-of-range setting
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
