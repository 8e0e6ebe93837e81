//! # farlog-parser
//!
//! Timeline reconstruction for Far Cry server logs.
//!
//! Gameplay lines carry only a `<mm:ss>` stamp. The parser anchors them to
//! the `Log Started at` header and the `g_timezone` cvar, counts minute
//! rollovers to recover hours and days, and extracts kills and suicides.
//!
//! ## Example
//!
//! ```no_run
//! use farlog_parser::{parse_file, ResolveOptions};
//!
//! let record = parse_file("logs/log00.txt", ResolveOptions::default()).unwrap();
//! println!(
//!     "{:?} from {} to {}: {} frags",
//!     record.map_name,
//!     record.session_start,
//!     record.session_end,
//!     record.events.len()
//! );
//! ```

pub mod classifier;
pub mod clock;
pub mod error;
pub mod extractor;
pub mod log_file;
pub mod session;

// Re-exports
pub use classifier::{classify, LineKind};
pub use clock::{Clock, ClockState, MinuteSecond};
pub use error::{Error, Result};
pub use extractor::{extract, Extraction};
pub use log_file::LogFile;
pub use session::{resolve, ResolveOptions, SessionBounds};

use farlog_core::MatchRecord;
use std::path::Path;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract events, then resolve the session window, into one record
pub fn parse_lines<S: AsRef<str>>(lines: &[S], options: ResolveOptions) -> Result<MatchRecord> {
    let extraction = extract(lines)?;
    let bounds = resolve(
        lines,
        extraction.map_name.as_deref(),
        extraction.log_start,
        options,
    )?;
    Ok(extraction.into_record(bounds))
}

/// Read a log file and parse it with [`parse_lines`]
pub fn parse_file<P: AsRef<Path>>(path: P, options: ResolveOptions) -> Result<MatchRecord> {
    let lines = LogFile::read(path)?;
    parse_lines(&lines, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use farlog_core::{EndMarker, Event};

    const LOG: &str = "\
Log Started at Saturday, March 09, 2019 17:40:11
FileVersion: 1.4.0.1
Lua cvar: (g_timezone,5)
Lua cvar: (sv_maxplayers,16)
<40:20>  Loading level Levels/mp_surf, mission ASSAULT
<40:26>  Level mp_surf loaded in 6 seconds
<41:02> <Lua> Cobra killed Papa with AG36
<59:59> <Lua> Papa killed itself
<00:04> <Lua> Papa killed Cobra with Vehicle
<00:04> Papa: nice
<03:45> == Statistics ==
";

    #[test]
    fn test_parse_lines() {
        let lines = LogFile::split(LOG);
        let record = parse_lines(&lines, ResolveOptions::default()).unwrap();

        let at = |s| DateTime::parse_from_rfc3339(s).unwrap();
        assert_eq!(record.map_name.as_deref(), Some("mp_surf"));
        assert_eq!(record.game_mode.as_deref(), Some("ASSAULT"));
        assert_eq!(record.log_start, at("2019-03-09T17:40:11+05:00"));
        assert_eq!(record.session_start, at("2019-03-09T17:40:26+05:00"));
        assert_eq!(record.session_end, at("2019-03-09T18:03:45+05:00"));
        assert_eq!(record.end_marker, EndMarker::Statistics);
        assert_eq!(record.events.len(), 3);
        assert_eq!(
            record.events[2],
            Event::Kill {
                time: at("2019-03-09T18:00:04+05:00"),
                killer: "Papa".to_string(),
                victim: "Cobra".to_string(),
                weapon: "Vehicle".to_string(),
            }
        );
    }

    #[test]
    fn test_boundary_failure_leaves_extraction_usable() {
        let lines: Vec<String> = LogFile::split(LOG)
            .into_iter()
            .filter(|l| !l.contains("Statistics"))
            .collect();

        let err = parse_lines(&lines, ResolveOptions::default()).unwrap_err();
        assert!(err.is_boundary_error());
        assert_eq!(extract(&lines).unwrap().events.len(), 3);

        let record = parse_lines(&lines, ResolveOptions::new().last_timestamp_fallback(true)).unwrap();
        assert_eq!(record.end_marker, EndMarker::LastTimestamp);
    }
}
