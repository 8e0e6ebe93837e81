//! Line classification
//!
//! Every line maps to exactly one [`LineKind`]. Classification never fails:
//! shapes that are not understood become [`LineKind::Other`] when they carry
//! a valid stamp and [`LineKind::Ignore`] otherwise.

use crate::clock::MinuteSecond;
use regex::Regex;
use std::sync::LazyLock;

const HEADER_MARKER: &str = "Log Started at";
const LOADING_MARKER: &str = "Loading level";
const STATISTICS_MARKER: &str = "== Statistics";
const CVAR_PREFIXES: [&str; 2] = ["Lua cvar:", "cvar"];

static LEVEL_LOADED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*Level\s+(\S+)\s+loaded in .* seconds").expect("valid level-loaded regex")
});

static ERROR_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ERROR: .*Function:").expect("valid error-marker regex"));

/// What a single log line means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `Log Started at <date>`, payload is the date text
    Header(&'a str),
    /// `cvar` assignment `(name,value)`
    Cvar {
        stamp: Option<MinuteSecond>,
        name: &'a str,
        value: &'a str,
    },
    /// `Loading level Levels/<map>, mission <mode>`
    LevelLoading {
        stamp: Option<MinuteSecond>,
        map: &'a str,
        mode: &'a str,
    },
    /// `<mm:ss>  Level <map> loaded in <n> seconds`
    LevelLoaded { time: MinuteSecond, map: &'a str },
    /// `<mm:ss> killer killed victim with weapon`
    Kill {
        time: MinuteSecond,
        killer: &'a str,
        victim: &'a str,
        weapon: &'a str,
    },
    /// `<mm:ss> actor killed itself`
    Suicide { time: MinuteSecond, actor: &'a str },
    /// `<mm:ss> == Statistics`
    Statistics(MinuteSecond),
    /// `<mm:ss> ... ERROR: ... Function: ...`
    ErrorMarker(MinuteSecond),
    /// Any other stamped line
    Other(MinuteSecond),
    /// Noise
    Ignore,
}

impl LineKind<'_> {
    /// The line's leading stamp, if it has one
    pub fn stamp(&self) -> Option<MinuteSecond> {
        match *self {
            LineKind::Cvar { stamp, .. } | LineKind::LevelLoading { stamp, .. } => stamp,
            LineKind::LevelLoaded { time, .. }
            | LineKind::Kill { time, .. }
            | LineKind::Suicide { time, .. }
            | LineKind::Statistics(time)
            | LineKind::ErrorMarker(time)
            | LineKind::Other(time) => Some(time),
            LineKind::Header(_) | LineKind::Ignore => None,
        }
    }
}

/// Classify one raw line
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(pos) = line.find(HEADER_MARKER) {
        return LineKind::Header(line[pos + HEADER_MARKER.len()..].trim());
    }

    match split_stamp(line) {
        Some((time, body)) => classify_stamped(time, body),
        None => classify_header_region(None, line),
    }
}

fn classify_stamped(time: MinuteSecond, body: &str) -> LineKind<'_> {
    if let Some(caps) = LEVEL_LOADED.captures(body) {
        if let Some(map) = caps.get(1) {
            return LineKind::LevelLoaded {
                time,
                map: map.as_str(),
            };
        }
    }

    if body.contains(STATISTICS_MARKER) {
        return LineKind::Statistics(time);
    }

    if ERROR_MARKER.is_match(body) {
        return LineKind::ErrorMarker(time);
    }

    let tokens: Vec<&str> = body.split_whitespace().filter(|t| !is_tag(t)).collect();
    match tokens.as_slice() {
        [actor, "killed", "itself"] => {
            return LineKind::Suicide {
                time,
                actor: *actor,
            }
        }
        [killer, "killed", victim, "with", weapon] => {
            return LineKind::Kill {
                time,
                killer: *killer,
                victim: *victim,
                weapon: *weapon,
            }
        }
        _ => {}
    }

    match classify_header_region(Some(time), body) {
        LineKind::Ignore => LineKind::Other(time),
        kind => kind,
    }
}

/// Cvar and level-loading lines, which may or may not carry a stamp
fn classify_header_region(stamp: Option<MinuteSecond>, body: &str) -> LineKind<'_> {
    if let Some((map, mode)) = parse_level_loading(body) {
        return LineKind::LevelLoading { stamp, map, mode };
    }

    if let Some((name, value)) = parse_cvar(body) {
        return LineKind::Cvar { stamp, name, value };
    }

    LineKind::Ignore
}

/// Split a leading `<mm:ss>` token off a line
///
/// Returns `None` when the first token is not bracketed or the stamp is out
/// of range.
pub fn split_stamp(line: &str) -> Option<(MinuteSecond, &str)> {
    let rest = line.trim_start().strip_prefix('<')?;
    let close = rest.find('>')?;
    let stamp = rest[..close].parse().ok()?;
    Some((stamp, &rest[close + 1..]))
}

fn is_tag(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('<') && token.ends_with('>')
}

fn parse_level_loading(body: &str) -> Option<(&str, &str)> {
    let after_marker = &body[body.find(LOADING_MARKER)? + LOADING_MARKER.len()..];
    let after_levels = &after_marker[after_marker.find("Levels/")? + "Levels/".len()..];

    let (map, rest) = after_levels.split_once(',')?;
    let mode = rest.trim_start().strip_prefix("mission")?.split_whitespace().next()?;

    let map = map.trim();
    if map.is_empty() {
        return None;
    }
    Some((map, mode))
}

/// `(name,value)` from a line that opens with `cvar` or `Lua cvar:`
fn parse_cvar(body: &str) -> Option<(&str, &str)> {
    let body = body.trim_start();
    let body = CVAR_PREFIXES.iter().find_map(|prefix| body.strip_prefix(*prefix))?;
    let open = body.find('(')?;
    let close = body.rfind(')')?;
    if close <= open {
        return None;
    }

    let mut parts = body[open + 1..close].split(',');
    let name = parts.next()?.trim();
    let value = parts.next()?.trim();
    if parts.next().is_some() || name.is_empty() {
        return None;
    }
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(s: &str) -> MinuteSecond {
        s.parse().unwrap()
    }

    #[test]
    fn test_header() {
        assert_eq!(
            classify("Log Started at Monday, June 01, 2020 20:15:30"),
            LineKind::Header("Monday, June 01, 2020 20:15:30")
        );
        // stray bytes before the marker do not matter
        assert_eq!(
            classify("\u{feff}Log Started at Friday, November 09, 2018 12:22:07\r"),
            LineKind::Header("Friday, November 09, 2018 12:22:07")
        );
    }

    #[test]
    fn test_cvar() {
        assert_eq!(
            classify("cvar(g_timezone,-5)"),
            LineKind::Cvar {
                stamp: None,
                name: "g_timezone",
                value: "-5"
            }
        );
        assert_eq!(
            classify("Lua cvar: (sv_maxplayers,16)"),
            LineKind::Cvar {
                stamp: None,
                name: "sv_maxplayers",
                value: "16"
            }
        );
    }

    #[test]
    fn test_malformed_cvar_is_ignored() {
        assert_eq!(classify("Lua cvar: (no_comma)"), LineKind::Ignore);
        assert_eq!(classify("Lua cvar: (a,b,c)"), LineKind::Ignore);
        assert_eq!(classify("Lua cvar: (unclosed,1"), LineKind::Ignore);
        assert_eq!(classify("Lua cvar: )backwards,1("), LineKind::Ignore);
        assert_eq!(classify("Lua cvar: (,1)"), LineKind::Ignore);
    }

    #[test]
    fn test_cvar_must_open_the_line() {
        assert_eq!(
            classify("<10:00> Bob: cvar(g_timezone,9)"),
            LineKind::Other(ms("10:00"))
        );
        assert_eq!(classify("Bob: Lua cvar: (g_timezone,9)"), LineKind::Ignore);
        assert_eq!(
            classify("<10:00>  Lua cvar: (sv_maxplayers,16)"),
            LineKind::Cvar {
                stamp: Some(ms("10:00")),
                name: "sv_maxplayers",
                value: "16"
            }
        );
    }

    #[test]
    fn test_level_loading() {
        assert_eq!(
            classify("<15:59>  Loading level Levels/mp_surf, mission ASSAULT"),
            LineKind::LevelLoading {
                stamp: Some(ms("15:59")),
                map: "mp_surf",
                mode: "ASSAULT"
            }
        );
        assert_eq!(
            classify("Loading level Levels/mp_jungle, mission FFA ...\r"),
            LineKind::LevelLoading {
                stamp: None,
                map: "mp_jungle",
                mode: "FFA"
            }
        );
        assert_eq!(classify("Loading level Levels/mp_surf"), LineKind::Ignore);
    }

    #[test]
    fn test_level_loaded() {
        assert_eq!(
            classify("<16:00>  Level mp_surf loaded in 6 seconds"),
            LineKind::LevelLoaded {
                time: ms("16:00"),
                map: "mp_surf"
            }
        );
        // without a stamp the boundary line is useless
        assert_eq!(classify("Level mp_surf loaded in 6 seconds"), LineKind::Ignore);
    }

    #[test]
    fn test_kill() {
        assert_eq!(
            classify("<05:12> Killer killed Victim with Falcon"),
            LineKind::Kill {
                time: ms("05:12"),
                killer: "Killer",
                victim: "Victim",
                weapon: "Falcon"
            }
        );
        assert_eq!(
            classify("<05:12> <Lua> Killer killed Victim with Falcon\r"),
            LineKind::Kill {
                time: ms("05:12"),
                killer: "Killer",
                victim: "Victim",
                weapon: "Falcon"
            }
        );
    }

    #[test]
    fn test_suicide() {
        assert_eq!(
            classify("<05:12> Killer killed itself"),
            LineKind::Suicide {
                time: ms("05:12"),
                actor: "Killer"
            }
        );
        assert_eq!(
            classify("<05:12> <Lua> Killer killed itself"),
            LineKind::Suicide {
                time: ms("05:12"),
                actor: "Killer"
            }
        );
    }

    #[test]
    fn test_unsupported_frag_shapes_fall_through() {
        // vehicle kills carry no weapon
        assert_eq!(classify("<05:12> <Lua> Bob killed Sam"), LineKind::Other(ms("05:12")));
        assert_eq!(classify("<05:12> killed"), LineKind::Other(ms("05:12")));
        assert_eq!(
            classify("<05:12> Big Bob killed Sam with Falcon"),
            LineKind::Other(ms("05:12"))
        );
        assert_eq!(classify("<05:12>"), LineKind::Other(ms("05:12")));
    }

    #[test]
    fn test_session_markers() {
        assert_eq!(
            classify("<41:12> == Statistics =="),
            LineKind::Statistics(ms("41:12"))
        );
        assert_eq!(
            classify("<41:12> !!! ERROR: script failed, Function: OnShutdown"),
            LineKind::ErrorMarker(ms("41:12"))
        );
    }

    #[test]
    fn test_noise_is_ignored() {
        assert_eq!(classify("Player chat: gg everyone"), LineKind::Ignore);
        assert_eq!(classify(""), LineKind::Ignore);
        assert_eq!(classify("<Lua> Killer killed Victim with Falcon"), LineKind::Ignore);
        assert_eq!(classify("05:12 Killer killed Victim with Falcon"), LineKind::Ignore);
        assert_eq!(classify("<75:12> Killer killed Victim with Falcon"), LineKind::Ignore);
        assert_eq!(classify("<05:12 Killer killed itself"), LineKind::Ignore);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let lines = [
            "Log Started at Monday, June 01, 2020 20:15:30",
            "cvar(g_timezone,-5)",
            "<05:12> Killer killed Victim with Falcon",
            "<05:12> Killer killed itself",
            "gibberish",
        ];
        for line in lines {
            assert_eq!(classify(line), classify(line));
        }
    }

    #[test]
    fn test_stamp_accessor() {
        assert_eq!(classify("<01:02> hello").stamp(), Some(ms("01:02")));
        assert_eq!(classify("cvar(a,b)").stamp(), None);
        assert_eq!(classify("<01:02> cvar(a,b)").stamp(), Some(ms("01:02")));
        assert_eq!(classify("noise").stamp(), None);
    }
}
