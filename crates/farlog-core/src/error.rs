//! Error types for farlog-core

use thiserror::Error;

/// Result type for farlog-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for farlog-core
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Match not found
    #[error("Match not found: {0}")]
    NotFound(i64),

    /// A log with the same content hash was already imported
    #[error("Log already imported as match {match_id} (hash: {hash})")]
    AlreadyImported { match_id: i64, hash: String },

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

