//! # farlog-core
//!
//! Core library for Far Cry match timelines.
//!
//! ## Features
//!
//! - Timeline types (`Event`, `MatchRecord`) shared with the parser
//! - Weapon icon table and human-readable frag rendering
//! - CSV export
//! - SQLite storage of matches and frags, with per-player statistics
//!
//! ## Example
//!
//! ```no_run
//! use farlog_core::{Database, LeaderboardOptions, StorageOperations};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Database::open("~/.farlog/matches.db").await?;
//!
//!     for m in db.storage().list().await? {
//!         println!("{} {:?} {}", m.id, m.map_name, m.start_time);
//!     }
//!
//!     let board = db.query().leaderboard(LeaderboardOptions::new().limit(5)).await?;
//!     println!("{} players", board.len());
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod export;
pub mod query;
pub mod render;
pub mod storage;
pub mod types;
pub mod weapons;

// Re-exports for convenience
pub use db::Database;
pub use error::{Error, Result};
pub use query::{LeaderboardOptions, PlayerStats, QueryBuilder};
pub use storage::{Storage, StorageOperations, StoredFrag, StoredMatch};
pub use types::{ConsoleVariables, EndMarker, Event, MatchRecord, TIMEZONE_CVAR};
pub use weapons::WeaponCategory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
