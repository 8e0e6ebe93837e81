//! Store command

use super::parse::format_duration;
use super::parse_error;
use crate::state::AppState;
use clap::Parser;
use farlog_core::StorageOperations;
use farlog_parser::{parse_lines, LogFile, ResolveOptions};
use sen::{Args, CliError, CliResult, State};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reconstruct a match and store it in the database
///
/// Usage:
///   farlog store --log logs/log00.txt
///   farlog store --log logs/log00.txt --db matches.db --force
#[derive(Parser, Debug)]
pub struct StoreArgs {
    /// Path to the server log
    #[arg(short, long)]
    pub log: PathBuf,

    /// Database file (default: $FARLOG_DB or ~/.farlog/matches.db)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Replace the match previously imported from the same log
    #[arg(short, long)]
    pub force: bool,

    /// End the session at the last stamped line when no end marker exists
    #[arg(long)]
    pub last_line_end: bool,
}

#[sen::handler]
pub async fn store(state: State<AppState>, Args(args): Args<StoreArgs>) -> CliResult<String> {
    let app = state.read().await;

    let bytes = LogFile::read_bytes(&args.log).map_err(parse_error)?;
    let file_hash = hash_content(&bytes);
    let lines = LogFile::decode(&bytes);

    let options = ResolveOptions::new().last_timestamp_fallback(args.last_line_end);
    let record = parse_lines(&lines, options).map_err(parse_error)?;

    let db = app
        .open_db(args.db.as_deref())
        .await
        .map_err(|e| CliError::system(format!("Failed to open database: {}", e)))?;
    let storage = db.storage();

    let existing = storage
        .find_by_hash(&file_hash)
        .await
        .map_err(|e| CliError::system(format!("Database error: {}", e)))?;

    let stored = match existing {
        Some(existing) if !args.force => return Err(already_imported(&args.log, existing)),
        Some(existing) => {
            info!("Replacing match {}", existing);
            storage.replace(&record, &file_hash).await
        }
        None => storage.insert(&record, Some(&file_hash)).await,
    };

    let match_id = stored.map_err(|e| match e {
        farlog_core::Error::AlreadyImported { match_id, .. } => {
            already_imported(&args.log, match_id)
        }
        e => CliError::system(format!("Failed to store match: {}", e)),
    })?;
    debug!("Stored {} as match {}", args.log.display(), match_id);

    db.close().await;

    Ok(format!(
        "✓ Stored match {}: {} ({})\n  {} → {} ({})\n  {} kills, {} suicides",
        match_id,
        record.map_name.as_deref().unwrap_or("unknown map"),
        record.game_mode.as_deref().unwrap_or("unknown mode"),
        record.session_start,
        record.session_end,
        format_duration(record.duration()),
        record.kill_count(),
        record.suicide_count()
    ))
}

fn already_imported(log: &Path, match_id: i64) -> CliError {
    CliError::user(format!(
        "{} was already imported as match {}. Use --force to replace it.",
        log.display(),
        match_id
    ))
}

/// SHA256 of the log content, hex encoded
fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
