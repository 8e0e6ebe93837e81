//! Stored match commands

use super::parse::format_duration;
use crate::state::AppState;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use farlog_core::render::prettify_all;
use farlog_core::{
    Database, Error, Event, LeaderboardOptions, StorageOperations, StoredFrag, WeaponCategory,
};
use sen::{Args, CliError, CliResult, State};
use std::path::PathBuf;

/// List stored matches
///
/// Usage:
///   farlog matches
///   farlog matches --db matches.db
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Database file (default: $FARLOG_DB or ~/.farlog/matches.db)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[sen::handler]
pub async fn list(state: State<AppState>, Args(args): Args<ListArgs>) -> CliResult<String> {
    let app = state.read().await;
    let db = open(&app, args.db).await?;

    let matches = db
        .storage()
        .list()
        .await
        .map_err(|e| CliError::system(format!("Failed to list matches: {}", e)))?;

    if matches.is_empty() {
        return Ok("No matches found.".to_string());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Green),
            Cell::new("Map").fg(Color::Green),
            Cell::new("Mode").fg(Color::Green),
            Cell::new("Start").fg(Color::Green),
            Cell::new("Duration").fg(Color::Green),
        ]);

    for m in &matches {
        table.add_row(vec![
            m.id.to_string(),
            m.map_name.clone().unwrap_or_else(|| "-".to_string()),
            m.game_mode.clone().unwrap_or_else(|| "-".to_string()),
            m.start_time.to_string(),
            format_duration(m.end_time - m.start_time),
        ]);
    }

    Ok(format!("\n{}\n\nTotal: {} matches", table, matches.len()))
}

/// Show the frags of a stored match
///
/// Usage:
///   farlog show 3
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Match ID
    pub id: i64,

    /// Database file (default: $FARLOG_DB or ~/.farlog/matches.db)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[sen::handler]
pub async fn show(state: State<AppState>, Args(args): Args<ShowArgs>) -> CliResult<String> {
    let app = state.read().await;
    let db = open(&app, args.db).await?;
    let storage = db.storage();

    let stored = storage
        .get(args.id)
        .await
        .map_err(|e| CliError::system(format!("Database error: {}", e)))?
        .ok_or_else(|| CliError::user(format!("Match not found: {}", args.id)))?;

    let frags = storage
        .frags(args.id)
        .await
        .map_err(|e| CliError::system(format!("Database error: {}", e)))?;
    let events: Vec<Event> = frags.into_iter().map(StoredFrag::into_event).collect();

    let weapons = db
        .query()
        .weapon_usage(Some(args.id))
        .await
        .map_err(|e| CliError::system(format!("Weapon usage query failed: {}", e)))?;

    let mut output = String::new();
    output.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    output.push_str(&format!("  Match #{}\n", stored.id));
    output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    output.push_str(&format!(
        "Map:         {}\n",
        stored.map_name.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "Mode:        {}\n",
        stored.game_mode.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Start:       {}\n", stored.start_time));
    output.push_str(&format!("End:         {}\n", stored.end_time));
    output.push_str(&format!("\nFrags:       {} total\n\n", events.len()));

    for line in prettify_all(&events) {
        output.push_str(&line);
        output.push('\n');
    }

    if !weapons.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Weapon").fg(Color::Cyan),
                Cell::new("Category").fg(Color::Cyan),
                Cell::new("Kills").fg(Color::Cyan),
            ]);

        for (weapon, uses) in &weapons {
            let category = WeaponCategory::of(weapon)
                .map(|c| format!("{} {}", c.icon(), c))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![weapon.clone(), category, uses.to_string()]);
        }

        output.push_str(&format!("\n{}\n", table));
    }

    output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    Ok(output)
}

/// Per-player kills, deaths and suicides
///
/// Usage:
///   farlog leaderboard
///   farlog leaderboard --match-id 3 --limit 10
#[derive(Parser, Debug)]
pub struct LeaderboardArgs {
    /// Only count frags of this match
    #[arg(short, long)]
    pub match_id: Option<i64>,

    /// Maximum number of players
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Database file (default: $FARLOG_DB or ~/.farlog/matches.db)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[sen::handler]
pub async fn leaderboard(
    state: State<AppState>,
    Args(args): Args<LeaderboardArgs>,
) -> CliResult<String> {
    let app = state.read().await;
    let db = open(&app, args.db).await?;

    let mut options = LeaderboardOptions::new();
    if let Some(match_id) = args.match_id {
        options = options.match_id(match_id);
    }
    if let Some(limit) = args.limit {
        options = options.limit(limit);
    }

    let players = db
        .query()
        .leaderboard(options)
        .await
        .map_err(|e| CliError::system(format!("Leaderboard query failed: {}", e)))?;

    if players.is_empty() {
        return Ok("No frags found.".to_string());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(Color::Yellow),
            Cell::new("Player").fg(Color::Yellow),
            Cell::new("Kills").fg(Color::Yellow),
            Cell::new("Deaths").fg(Color::Yellow),
            Cell::new("Suicides").fg(Color::Yellow),
        ]);

    for (rank, p) in players.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            p.player.clone(),
            p.kills.to_string(),
            p.deaths.to_string(),
            p.suicides.to_string(),
        ]);
    }

    Ok(format!("\n{}", table))
}

/// Delete a stored match and its frags
///
/// Usage:
///   farlog delete 3
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Match ID
    pub id: i64,

    /// Database file (default: $FARLOG_DB or ~/.farlog/matches.db)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[sen::handler]
pub async fn delete(state: State<AppState>, Args(args): Args<DeleteArgs>) -> CliResult<String> {
    let app = state.read().await;
    let db = open(&app, args.db).await?;

    db.storage().delete(args.id).await.map_err(|e| match e {
        Error::NotFound(id) => CliError::user(format!("Match not found: {}", id)),
        e => CliError::system(format!("Failed to delete match {}: {}", args.id, e)),
    })?;

    db.close().await;
    Ok(format!("✓ Deleted match {}", args.id))
}

async fn open(app: &AppState, path: Option<PathBuf>) -> Result<Database, CliError> {
    app.open_db(path.as_deref())
        .await
        .map_err(|e| CliError::system(format!("Failed to open database: {}", e)))
}
