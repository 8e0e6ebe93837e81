//! Match timeline types shared by the parser, exporters and storage

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Console variable holding the server's UTC offset in hours
pub const TIMEZONE_CVAR: &str = "g_timezone";

/// Console variables captured from the log header region (last write wins)
pub type ConsoleVariables = HashMap<String, String>;

/// A single frag recorded in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Event {
    /// One player killed another
    Kill {
        time: DateTime<FixedOffset>,
        killer: String,
        victim: String,
        weapon: String,
    },
    /// A player killed themselves
    Suicide {
        time: DateTime<FixedOffset>,
        killer: String,
    },
}

impl Event {
    /// Absolute time of the frag
    pub fn time(&self) -> DateTime<FixedOffset> {
        match self {
            Event::Kill { time, .. } | Event::Suicide { time, .. } => *time,
        }
    }

    /// Name of the player credited with the frag
    pub fn killer(&self) -> &str {
        match self {
            Event::Kill { killer, .. } | Event::Suicide { killer, .. } => killer,
        }
    }

    /// Victim name, `None` for suicides
    pub fn victim(&self) -> Option<&str> {
        match self {
            Event::Kill { victim, .. } => Some(victim),
            Event::Suicide { .. } => None,
        }
    }

    /// Weapon code, `None` for suicides
    pub fn weapon(&self) -> Option<&str> {
        match self {
            Event::Kill { weapon, .. } => Some(weapon),
            Event::Suicide { .. } => None,
        }
    }

    pub fn is_suicide(&self) -> bool {
        matches!(self, Event::Suicide { .. })
    }
}

/// Which log line closed the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndMarker {
    /// `== Statistics` block
    Statistics,
    /// `ERROR: ... Function:` line
    Error,
    /// Last timestamped line of the log, only when explicitly requested
    LastTimestamp,
}

impl EndMarker {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EndMarker::Statistics => "statistics",
            EndMarker::Error => "error",
            EndMarker::LastTimestamp => "last_timestamp",
        }
    }
}

impl fmt::Display for EndMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reconstructed match
///
/// This is the artifact handed to exporters and storage. It is never
/// mutated after the parser builds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Map name from the level-loading line
    pub map_name: Option<String>,

    /// Game mode from the level-loading line
    pub game_mode: Option<String>,

    /// Anchor for every reconstructed timestamp
    pub log_start: DateTime<FixedOffset>,

    /// When the level finished loading
    pub session_start: DateTime<FixedOffset>,

    /// When the statistics (or error) marker was written
    pub session_end: DateTime<FixedOffset>,

    /// Source of `session_end`
    pub end_marker: EndMarker,

    /// Console variables seen in the log
    pub cvars: ConsoleVariables,

    /// Frags in file order
    pub events: Vec<Event>,
}

impl MatchRecord {
    /// Number of kills (suicides excluded)
    pub fn kill_count(&self) -> usize {
        self.events.iter().filter(|e| !e.is_suicide()).count()
    }

    /// Number of suicides
    pub fn suicide_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_suicide()).count()
    }

    /// Session duration
    pub fn duration(&self) -> chrono::Duration {
        self.session_end - self.session_start
    }

    /// Convert to JSON
    pub fn to_json(&self) -> Result<String, crate::Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn sample_record() -> MatchRecord {
        MatchRecord {
            map_name: Some("mp_surf".to_string()),
            game_mode: Some("ASSAULT".to_string()),
            log_start: at("2019-03-11T17:40:00+05:00"),
            session_start: at("2019-03-11T17:44:37+05:00"),
            session_end: at("2019-03-11T18:02:15+05:00"),
            end_marker: EndMarker::Statistics,
            cvars: ConsoleVariables::new(),
            events: vec![
                Event::Kill {
                    time: at("2019-03-11T17:45:10+05:00"),
                    killer: "Jack".to_string(),
                    victim: "Val".to_string(),
                    weapon: "P90".to_string(),
                },
                Event::Suicide {
                    time: at("2019-03-11T17:50:00+05:00"),
                    killer: "Val".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_event_accessors() {
        let record = sample_record();
        let kill = &record.events[0];
        assert_eq!(kill.killer(), "Jack");
        assert_eq!(kill.victim(), Some("Val"));
        assert_eq!(kill.weapon(), Some("P90"));
        assert!(!kill.is_suicide());

        let suicide = &record.events[1];
        assert_eq!(suicide.victim(), None);
        assert_eq!(suicide.weapon(), None);
        assert!(suicide.is_suicide());
    }

    #[test]
    fn test_record_counts_and_duration() {
        let record = sample_record();
        assert_eq!(record.kill_count(), 1);
        assert_eq!(record.suicide_count(), 1);
        assert_eq!(record.duration(), chrono::Duration::seconds(17 * 60 + 38));
    }

    #[test]
    fn test_event_json_is_tagged() {
        let record = sample_record();
        let json = serde_json::to_value(&record.events[1]).unwrap();
        assert_eq!(json["kind"], "suicide");
        assert_eq!(json["killer"], "Val");
        assert_eq!(json["time"], "2019-03-11T17:50:00+05:00");
    }

    #[test]
    fn test_end_marker_display() {
        assert_eq!(EndMarker::Statistics.to_string(), "statistics");
        assert_eq!(EndMarker::LastTimestamp.to_string(), "last_timestamp");
    }
}
