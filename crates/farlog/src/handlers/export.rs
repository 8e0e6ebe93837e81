//! Export command

use super::{parse_error, read_log};
use crate::state::AppState;
use clap::Parser;
use farlog_core::export::write_csv_file;
use farlog_parser::extract;
use sen::{Args, CliError, CliResult, State};
use std::path::PathBuf;

/// Export the frags of a server log as CSV
///
/// Usage:
///   farlog export --log logs/log00.txt
///   farlog export --log logs/log00.txt --out frags.csv
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Path to the server log
    #[arg(short, long)]
    pub log: PathBuf,

    /// Destination CSV file
    #[arg(short, long, default_value = "logs/log.csv")]
    pub out: PathBuf,
}

#[sen::handler]
pub async fn export(_state: State<AppState>, Args(args): Args<ExportArgs>) -> CliResult<String> {
    let lines = read_log(&args.log)?;
    let extraction = extract(&lines).map_err(parse_error)?;

    write_csv_file(&args.out, &extraction.events).map_err(|e| {
        CliError::system(format!("Failed to write {}: {}", args.out.display(), e))
    })?;

    Ok(format!(
        "✓ Exported {} frags to {}",
        extraction.events.len(),
        args.out.display()
    ))
}
