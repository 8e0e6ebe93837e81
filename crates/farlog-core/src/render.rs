//! Human-readable frag lines

use crate::weapons::weapon_icon;
use crate::Event;

/// Render a frag as a single line
///
/// Kills read `[time] 🙂  killer 🔫  ☹️  victim`, suicides read
/// `[time] ☹️  killer ☠️`. A weapon missing from the icon table is
/// rendered without an icon.
pub fn prettify(event: &Event) -> String {
    match event {
        Event::Kill {
            time,
            killer,
            victim,
            weapon,
        } => match weapon_icon(weapon) {
            Some(icon) => format!("[{}] 🙂  {} {}  ☹️  {}", time, killer, icon, victim),
            None => format!("[{}] 🙂  {}  ☹️  {}", time, killer, victim),
        },
        Event::Suicide { time, killer } => format!("[{}] ☹️  {} ☠️", time, killer),
    }
}

/// Render every frag in order
pub fn prettify_all(events: &[Event]) -> Vec<String> {
    events.iter().map(prettify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn kill(weapon: &str) -> Event {
        Event::Kill {
            time: DateTime::parse_from_rfc3339("2020-06-01T20:05:12-05:00").unwrap(),
            killer: "Killer".to_string(),
            victim: "Victim".to_string(),
            weapon: weapon.to_string(),
        }
    }

    #[test]
    fn test_prettify_kill() {
        assert_eq!(
            prettify(&kill("Falcon")),
            "[2020-06-01 20:05:12 -05:00] 🙂  Killer 🔫  ☹️  Victim"
        );
    }

    #[test]
    fn test_prettify_unknown_weapon() {
        assert_eq!(
            prettify(&kill("Flamethrower")),
            "[2020-06-01 20:05:12 -05:00] 🙂  Killer  ☹️  Victim"
        );
    }

    #[test]
    fn test_prettify_suicide() {
        let event = Event::Suicide {
            time: DateTime::parse_from_rfc3339("2020-06-01T20:05:12-05:00").unwrap(),
            killer: "Killer".to_string(),
        };
        assert_eq!(prettify(&event), "[2020-06-01 20:05:12 -05:00] ☹️  Killer ☠️");
    }

    #[test]
    fn test_prettify_all_keeps_order() {
        let lines = prettify_all(&[kill("Machete"), kill("Boat")]);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("🔪"));
        assert!(lines[1].contains("🚤"));
    }
}
