//! Session boundary detection

use crate::classifier::{classify, LineKind};
use crate::clock::Clock;
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset};
use farlog_core::EndMarker;
use tracing::{debug, warn};

/// Options for [`resolve`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Heuristic: when the log has neither a statistics nor an error marker,
    /// end the session at the last stamped line instead of failing.
    pub last_timestamp_fallback: bool,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_timestamp_fallback(mut self, enabled: bool) -> Self {
        self.last_timestamp_fallback = enabled;
        self
    }
}

/// Start and end of one match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionBounds {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub end_marker: EndMarker,
}

/// Find when the match started and ended
///
/// A fresh clock anchored at `log_start` is replayed over every stamped
/// line, so each boundary accounts for all rollovers before it.
///
/// The start is the first `Level <map> loaded in ... seconds` line for
/// `map_name` (any map when `None`). The end is the first statistics marker
/// after the start, else the first error marker after the start.
pub fn resolve<S: AsRef<str>>(
    lines: &[S],
    map_name: Option<&str>,
    log_start: DateTime<FixedOffset>,
    options: ResolveOptions,
) -> Result<SessionBounds> {
    let mut clock = Clock::new(log_start);
    let mut start = None;
    let mut first_error = None;
    let mut last_stamped = None;

    for line in lines {
        let kind = classify(line.as_ref());
        let Some(stamp) = kind.stamp() else {
            continue;
        };
        let time = clock.advance(stamp);

        let session_start = match start {
            Some(session_start) => session_start,
            None => {
                if let LineKind::LevelLoaded { map, .. } = kind {
                    if map_name.map_or(true, |name| name == map) {
                        debug!("Session start at {} ({})", time, map);
                        start = Some(time);
                    }
                }
                continue;
            }
        };

        last_stamped = Some(time);
        match kind {
            LineKind::Statistics(_) => {
                debug!("Session end at {} (statistics)", time);
                return Ok(SessionBounds {
                    start: session_start,
                    end: time,
                    end_marker: EndMarker::Statistics,
                });
            }
            LineKind::ErrorMarker(_) if first_error.is_none() => first_error = Some(time),
            _ => {}
        }
    }

    let start = start.ok_or_else(|| Error::SessionStartNotFound {
        map: map_name.map(str::to_string),
    })?;

    if let Some(end) = first_error {
        debug!("Session end at {} (error marker)", end);
        return Ok(SessionBounds {
            start,
            end,
            end_marker: EndMarker::Error,
        });
    }

    if options.last_timestamp_fallback {
        let end = last_stamped.unwrap_or(start);
        warn!("No end marker found, using last stamped line at {}", end);
        return Ok(SessionBounds {
            start,
            end,
            end_marker: EndMarker::LastTimestamp,
        });
    }

    Err(Error::SessionEndNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn anchor() -> DateTime<FixedOffset> {
        at("2020-06-01T20:10:00-05:00")
    }

    #[test]
    fn test_statistics_end_counts_rollovers() {
        let lines = [
            "<10:30>  Level mp_surf loaded in 6 seconds",
            "<45:00> A killed B with P90",
            "<05:00> A killed B with P90",
            "<50:00> A killed B with P90",
            "<20:00> == Statistics ==",
            "<59:00> ERROR: late, Function: Whatever",
        ];
        let bounds = resolve(&lines, Some("mp_surf"), anchor(), ResolveOptions::new()).unwrap();
        assert_eq!(bounds.start, at("2020-06-01T20:10:30-05:00"));
        assert_eq!(bounds.end, at("2020-06-01T22:20:00-05:00"));
        assert_eq!(bounds.end_marker, EndMarker::Statistics);
    }

    #[test]
    fn test_start_must_match_map() {
        let lines = [
            "<10:30>  Level mp_other loaded in 6 seconds",
            "<11:00>  Level mp_surf loaded in 2 seconds",
            "<20:00> == Statistics ==",
        ];
        let bounds = resolve(&lines, Some("mp_surf"), anchor(), ResolveOptions::new()).unwrap();
        assert_eq!(bounds.start, at("2020-06-01T20:11:00-05:00"));

        let bounds = resolve(&lines, None, anchor(), ResolveOptions::new()).unwrap();
        assert_eq!(bounds.start, at("2020-06-01T20:10:30-05:00"));
    }

    #[test]
    fn test_error_marker_fallback() {
        let lines = [
            "<10:30>  Level mp_surf loaded in 6 seconds",
            "<12:00> !!! ERROR: bad, Function: OnUpdate",
            "<13:00> ERROR: worse, Function: OnUpdate",
        ];
        let bounds = resolve(&lines, Some("mp_surf"), anchor(), ResolveOptions::new()).unwrap();
        assert_eq!(bounds.end, at("2020-06-01T20:12:00-05:00"));
        assert_eq!(bounds.end_marker, EndMarker::Error);
    }

    #[test]
    fn test_statistics_preferred_over_earlier_error() {
        let lines = [
            "<10:30>  Level mp_surf loaded in 6 seconds",
            "<12:00> ERROR: bad, Function: OnUpdate",
            "<30:00> == Statistics ==",
        ];
        let bounds = resolve(&lines, None, anchor(), ResolveOptions::new()).unwrap();
        assert_eq!(bounds.end, at("2020-06-01T20:30:00-05:00"));
        assert_eq!(bounds.end_marker, EndMarker::Statistics);
    }

    #[test]
    fn test_markers_before_start_are_ignored() {
        let lines = [
            "<09:00> == Statistics ==",
            "<09:30> ERROR: early, Function: Init",
            "<10:30>  Level mp_surf loaded in 6 seconds",
            "<20:00> == Statistics ==",
        ];
        let bounds = resolve(&lines, Some("mp_surf"), anchor(), ResolveOptions::new()).unwrap();
        assert_eq!(bounds.start, at("2020-06-01T20:10:30-05:00"));
        assert_eq!(bounds.end, at("2020-06-01T20:20:00-05:00"));
        assert_eq!(bounds.end_marker, EndMarker::Statistics);

        let err = resolve(&lines[..3], Some("mp_surf"), anchor(), ResolveOptions::new()).unwrap_err();
        assert!(matches!(err, Error::SessionEndNotFound));
    }

    #[test]
    fn test_missing_start() {
        let lines = ["<20:00> == Statistics =="];
        let err = resolve(&lines, Some("mp_surf"), anchor(), ResolveOptions::new()).unwrap_err();
        assert!(matches!(err, Error::SessionStartNotFound { map: Some(ref m) } if m == "mp_surf"));
        assert!(err.is_boundary_error());
    }

    #[test]
    fn test_missing_end() {
        let lines = [
            "<10:30>  Level mp_surf loaded in 6 seconds",
            "<20:00> A killed B with P90",
        ];
        let err = resolve(&lines, None, anchor(), ResolveOptions::new()).unwrap_err();
        assert!(matches!(err, Error::SessionEndNotFound));
    }

    #[test]
    fn test_last_timestamp_fallback_is_opt_in() {
        let lines = [
            "<10:30>  Level mp_surf loaded in 6 seconds",
            "<55:00> A killed B with P90",
            "<02:00> A killed B with P90",
            "trailing noise",
        ];
        let options = ResolveOptions::new().last_timestamp_fallback(true);
        let bounds = resolve(&lines, None, anchor(), options).unwrap();
        assert_eq!(bounds.end, at("2020-06-01T21:02:00-05:00"));
        assert_eq!(bounds.end_marker, EndMarker::LastTimestamp);
    }
}
