//! Error types for farlog-parser

use std::path::PathBuf;
use thiserror::Error;

/// Result type for farlog-parser operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for farlog-parser
#[derive(Error, Debug)]
pub enum Error {
    /// A `mm:ss` token that is not two in-range numbers
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// The timezone cvar never appears, so no time can be anchored
    #[error("Missing timezone: cvar '{}' not found in log", farlog_core::TIMEZONE_CVAR)]
    MissingTimezone,

    /// The timezone cvar is not an hour offset
    #[error("Invalid timezone value: {0}")]
    InvalidTimezone(String),

    /// No `Log Started at` header line
    #[error("Missing log start header")]
    MissingLogStart,

    /// The header date does not parse
    #[error("Invalid log start time: {0}")]
    InvalidLogStart(String),

    /// No `Level <map> loaded in ... seconds` line
    #[error("Session start not found (map: {})", map.as_deref().unwrap_or("any"))]
    SessionStartNotFound { map: Option<String> },

    /// Neither a statistics nor an error marker
    #[error("Session end not found: no statistics or error marker in log")]
    SessionEndNotFound,

    /// The log file could not be read
    #[error("Log unreadable: {}: {source}", path.display())]
    LogUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] farlog_core::Error),
}

impl Error {
    /// Whether only the session window is affected, so the events are still usable
    pub fn is_boundary_error(&self) -> bool {
        matches!(
            self,
            Error::SessionStartNotFound { .. } | Error::SessionEndNotFound
        )
    }
}
