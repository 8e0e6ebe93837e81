//! Parse command

use super::{parse_error, read_log};
use crate::state::AppState;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use farlog_core::render::prettify_all;
use farlog_parser::{extract, resolve, Extraction, ResolveOptions, SessionBounds};
use sen::{Args, CliError, CliResult, State};
use std::path::PathBuf;
use tracing::warn;

/// Show the reconstructed timeline of a server log
///
/// Usage:
///   farlog parse --log logs/log00.txt
///   farlog parse --log logs/log00.txt --json
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Path to the server log
    #[arg(short, long)]
    pub log: PathBuf,

    /// Print the match as JSON
    #[arg(long)]
    pub json: bool,

    /// End the session at the last stamped line when no end marker exists
    #[arg(long)]
    pub last_line_end: bool,
}

#[sen::handler]
pub async fn parse(_state: State<AppState>, Args(args): Args<ParseArgs>) -> CliResult<String> {
    let lines = read_log(&args.log)?;
    let extraction = extract(&lines).map_err(parse_error)?;

    let options = ResolveOptions::new().last_timestamp_fallback(args.last_line_end);
    let bounds = match resolve(
        &lines,
        extraction.map_name.as_deref(),
        extraction.log_start,
        options,
    ) {
        Ok(bounds) => Ok(bounds),
        Err(e) if e.is_boundary_error() => {
            warn!("{}", e);
            Err(e.to_string())
        }
        Err(e) => return Err(parse_error(e)),
    };

    if args.json {
        return render_json(extraction, bounds);
    }

    Ok(render_text(&extraction, &bounds))
}

fn render_json(extraction: Extraction, bounds: Result<SessionBounds, String>) -> CliResult<String> {
    let json = match bounds {
        Ok(bounds) => extraction.into_record(bounds).to_json(),
        Err(session_error) => serde_json::to_string_pretty(&serde_json::json!({
            "map_name": extraction.map_name,
            "game_mode": extraction.game_mode,
            "log_start": extraction.log_start,
            "cvars": extraction.cvars,
            "events": extraction.events,
            "session_error": session_error,
        }))
        .map_err(farlog_core::Error::from),
    };

    json.map_err(|e| CliError::system(format!("Failed to serialize match: {}", e)))
}

fn render_text(extraction: &Extraction, bounds: &Result<SessionBounds, String>) -> String {
    let mut output = String::new();
    output.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    output.push_str(&format!(
        "  Match: {}\n",
        extraction.map_name.as_deref().unwrap_or("unknown map")
    ));
    output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Field").fg(Color::Green),
            Cell::new("Value").fg(Color::Green),
        ]);

    table.add_row(vec![
        "Game mode".to_string(),
        extraction.game_mode.clone().unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec!["Log started".to_string(), extraction.log_start.to_string()]);
    match bounds {
        Ok(bounds) => {
            table.add_row(vec!["Session start".to_string(), bounds.start.to_string()]);
            table.add_row(vec![
                "Session end".to_string(),
                format!("{} ({})", bounds.end, bounds.end_marker),
            ]);
            table.add_row(vec![
                "Duration".to_string(),
                format_duration(bounds.end - bounds.start),
            ]);
        }
        Err(e) => {
            table.add_row(vec!["Session".to_string(), format!("⚠ {}", e)]);
        }
    }

    let suicides = extraction.events.iter().filter(|e| e.is_suicide()).count();
    table.add_row(vec![
        "Frags".to_string(),
        format!(
            "{} kills, {} suicides",
            extraction.events.len() - suicides,
            suicides
        ),
    ]);
    table.add_row(vec!["Cvars".to_string(), extraction.cvars.len().to_string()]);
    if extraction.skipped_lines > 0 {
        table.add_row(vec![
            "Skipped lines".to_string(),
            extraction.skipped_lines.to_string(),
        ]);
    }

    output.push_str(&format!("{}\n", table));

    if !extraction.events.is_empty() {
        output.push_str("\n────────────────────────────────────────\n");
        output.push_str("  Frags\n");
        output.push_str("────────────────────────────────────────\n\n");

        for line in prettify_all(&extraction.events) {
            output.push_str(&line);
            output.push('\n');
        }
    }

    output.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    output
}

pub(crate) fn format_duration(duration: chrono::Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!("{}h {:02}m {:02}s", total / 3600, (total % 3600) / 60, total % 60)
}
