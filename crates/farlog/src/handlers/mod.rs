//! Command handlers

pub mod export;
pub mod matches;
pub mod parse;
pub mod store;

use farlog_parser::{Error, LogFile};
use sen::CliError;
use std::path::Path;

/// Read a log, turning I/O failures into a user-facing error
pub(crate) fn read_log(path: &Path) -> Result<Vec<String>, CliError> {
    LogFile::read(path).map_err(parse_error)
}

/// Map parser failures to CLI errors
///
/// Problems with the log itself are the user's to fix; anything from the
/// core library is a system error.
pub(crate) fn parse_error(e: Error) -> CliError {
    match e {
        Error::Core(e) => CliError::system(format!("Internal error: {}", e)),
        e => CliError::user(e.to_string()),
    }
}
