//! Application state

use farlog_core::Database;
use std::path::Path;

/// Application state shared across handlers
#[derive(Clone, Default)]
pub struct AppState;

impl AppState {
    /// Create a new AppState
    pub fn new() -> Self {
        Self
    }

    /// Open the database, preferring an explicit path over the default
    ///
    /// The default location is only resolved when no path is given, so
    /// commands that never touch the database work without `$HOME`.
    pub async fn open_db(&self, path: Option<&Path>) -> farlog_core::Result<Database> {
        match path {
            Some(path) => Database::open(path).await,
            None => Database::open(Database::default_path()?).await,
        }
    }
}
