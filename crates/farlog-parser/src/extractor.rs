//! Single-pass frag extraction

use crate::classifier::{classify, LineKind};
use crate::clock::{Clock, ClockState, MinuteSecond};
use crate::session::SessionBounds;
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use farlog_core::{ConsoleVariables, Event, MatchRecord, TIMEZONE_CVAR};
use tracing::{debug, info, warn};

/// Everything recovered from a log before session boundaries are known
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Anchor for every reconstructed time
    pub log_start: DateTime<FixedOffset>,
    /// Map from the first level-loading line
    pub map_name: Option<String>,
    /// Game mode from the first level-loading line
    pub game_mode: Option<String>,
    /// Console variables, last write wins
    pub cvars: ConsoleVariables,
    /// Frags in file order
    pub events: Vec<Event>,
    /// Clock state after the last stamped line
    pub clock: ClockState,
    /// Lines dropped because their stamp was malformed
    pub skipped_lines: usize,
}

impl Extraction {
    /// Combine with resolved session boundaries into the final record
    pub fn into_record(self, bounds: SessionBounds) -> MatchRecord {
        MatchRecord {
            map_name: self.map_name,
            game_mode: self.game_mode,
            log_start: self.log_start,
            session_start: bounds.start,
            session_end: bounds.end,
            end_marker: bounds.end_marker,
            cvars: self.cvars,
            events: self.events,
        }
    }
}

/// Extract cvars, level info and frags from a whole log
///
/// Lines are classified once. The header-region data (cvars, log start,
/// level) is gathered first so the log start can be anchored no matter
/// where the timezone cvar appears; then a single clock is threaded through
/// every stamped line in file order.
pub fn extract<S: AsRef<str>>(lines: &[S]) -> Result<Extraction> {
    let kinds: Vec<LineKind<'_>> = lines.iter().map(|l| classify(l.as_ref())).collect();

    let mut cvars = ConsoleVariables::new();
    let mut header = None;
    let mut level = None;
    for kind in &kinds {
        match *kind {
            LineKind::Header(raw) if header.is_none() => header = Some(raw),
            LineKind::Cvar { name, value, .. } => {
                cvars.insert(name.to_string(), value.to_string());
            }
            LineKind::LevelLoading { map, mode, .. } if level.is_none() => {
                level = Some((map.to_string(), mode.to_string()))
            }
            _ => {}
        }
    }
    debug!("Collected {} cvars", cvars.len());

    let log_start = log_start_time(header, &cvars)?;
    info!("Log started at {}", log_start);

    let mut clock = Clock::new(log_start);
    let mut events = Vec::new();
    let mut skipped_lines = 0;

    for (index, kind) in kinds.iter().enumerate() {
        let Some(stamp) = kind.stamp() else {
            if let Some(err) = malformed_stamp(lines[index].as_ref()) {
                warn!("Skipping line {}: {}", index + 1, err);
                skipped_lines += 1;
            }
            continue;
        };

        let time = clock.advance(stamp);
        match *kind {
            LineKind::Kill {
                killer,
                victim,
                weapon,
                ..
            } => events.push(Event::Kill {
                time,
                killer: killer.to_string(),
                victim: victim.to_string(),
                weapon: weapon.to_string(),
            }),
            LineKind::Suicide { actor, .. } => events.push(Event::Suicide {
                time,
                killer: actor.to_string(),
            }),
            _ => {}
        }
    }

    let state = clock.state();
    info!(
        "Extracted {} frags ({} hours elapsed)",
        events.len(),
        state.elapsed_hours()
    );

    let (map_name, game_mode) = match level {
        Some((map, mode)) => (Some(map), Some(mode)),
        None => (None, None),
    };

    Ok(Extraction {
        log_start,
        map_name,
        game_mode,
        cvars,
        events,
        clock: state,
        skipped_lines,
    })
}

/// Anchor the header date in the server timezone
///
/// The header reads `<Weekday>, <Month> <Day>, <Year> <HH:MM:SS>`; the
/// weekday is not checked.
pub fn log_start_time(
    header: Option<&str>,
    cvars: &ConsoleVariables,
) -> Result<DateTime<FixedOffset>> {
    let header = header.ok_or(Error::MissingLogStart)?;
    let timezone = cvars.get(TIMEZONE_CVAR).ok_or(Error::MissingTimezone)?;
    let offset = parse_timezone(timezone)?;

    let invalid = || Error::InvalidLogStart(header.to_string());
    let (_weekday, date) = header.split_once(',').ok_or_else(invalid)?;
    let naive = NaiveDateTime::parse_from_str(date.trim(), "%B %d, %Y %H:%M:%S")
        .map_err(|_| invalid())?;

    naive.and_local_timezone(offset).single().ok_or_else(invalid)
}

/// Parse a whole-hour UTC offset such as `-5`, `+2` or `10`
pub fn parse_timezone(value: &str) -> Result<FixedOffset> {
    let invalid = || Error::InvalidTimezone(value.to_string());

    let hours: i32 = value.trim().parse().map_err(|_| invalid())?;
    if !(-12..=14).contains(&hours) {
        return Err(invalid());
    }
    FixedOffset::east_opt(hours * 3600).ok_or_else(invalid)
}

/// The stamp error for a line that opens with a bracketed `..:..` token
/// that does not parse
fn malformed_stamp(line: &str) -> Option<Error> {
    let rest = line.trim_start().strip_prefix('<')?;
    let token = &rest[..rest.find('>')?];
    if !token.contains(':') {
        return None;
    }
    token.parse::<MinuteSecond>().err()
}
