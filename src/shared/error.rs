use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("No database configuration found ({} candidate paths searched)", .searched.len())]
    ConfigurationNotFound { searched: Vec<PathBuf> },

    #[error("Failed to parse database configuration {}: {message}", .path.display())]
    ConfigurationParse { path: PathBuf, message: String },

    #[error("Unsupported database adapter: {0}")]
    UnsupportedAdapter(String),

    #[error("Invalid database configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to connect to database: {0}")]
    ConnectionFailure(String),

    #[error("Feed cache store is not connected")]
    NotConnected,

    #[error("Feed cache table is missing columns: {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;
