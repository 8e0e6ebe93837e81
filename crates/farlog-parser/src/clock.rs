//! Wall-clock reconstruction from truncated `mm:ss` stamps
//!
//! Gameplay lines only record minute and second. The hour is recovered by
//! counting rollovers: every time a stamp is smaller than the previous one,
//! an hour has passed.

use crate::{Error, Result};
use chrono::{DateTime, Duration, FixedOffset, Timelike};
use std::fmt;
use std::str::FromStr;

/// A validated `mm:ss` stamp
///
/// Ordering is by minute, then second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteSecond {
    minute: u32,
    second: u32,
}

impl MinuteSecond {
    /// Create a stamp, `None` unless both parts are in `0..=59`
    pub fn new(minute: u32, second: u32) -> Option<Self> {
        (minute < 60 && second < 60).then_some(Self { minute, second })
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> u32 {
        self.second
    }

    /// Minute and second of an absolute time
    pub fn of<Tz: chrono::TimeZone>(time: &DateTime<Tz>) -> Self {
        Self {
            minute: time.minute(),
            second: time.second(),
        }
    }
}

impl FromStr for MinuteSecond {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedTimestamp(s.to_string());

        let (minute, second) = s.split_once(':').ok_or_else(malformed)?;
        if minute.len() != 2 || second.len() != 2 {
            return Err(malformed());
        }
        if !minute.bytes().chain(second.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let minute = minute.parse().map_err(|_| malformed())?;
        let second = second.parse().map_err(|_| malformed())?;
        MinuteSecond::new(minute, second).ok_or_else(malformed)
    }
}

impl fmt::Display for MinuteSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minute, self.second)
    }
}

/// Rollover bookkeeping for one pass over a log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockState {
    /// Last stamp observed
    pub last: MinuteSecond,
    /// Hours elapsed since the anchor, folded into `day_offset` past 24
    pub hour_offset: u32,
    /// Days elapsed since the anchor
    pub day_offset: u32,
}

impl ClockState {
    /// Record a stamp, returning `true` when it rolled the hour over
    ///
    /// Equal stamps are not a rollover: several lines may share a second.
    pub fn observe(&mut self, stamp: MinuteSecond) -> bool {
        let rolled_over = stamp < self.last;
        if rolled_over {
            self.hour_offset += 1;
            if self.hour_offset > 24 {
                self.hour_offset -= 24;
                self.day_offset += 1;
            }
        }
        self.last = stamp;
        rolled_over
    }

    /// Total elapsed whole hours
    pub fn elapsed_hours(&self) -> i64 {
        i64::from(self.day_offset) * 24 + i64::from(self.hour_offset)
    }
}

/// Converts stamps into absolute times anchored at the log start
///
/// Stamps must be fed in file order; the clock is a sequential accumulator.
#[derive(Debug, Clone)]
pub struct Clock {
    anchor: DateTime<FixedOffset>,
    state: ClockState,
}

impl Clock {
    /// Create a clock anchored at the log start
    ///
    /// Counting starts from `00:00`, so stamps that never decrease never roll
    /// the hour. A first stamp below the anchor's own minute (log started at
    /// `20:59:50`, first line `<00:05>`) resolves to `20:00:05`, before the
    /// log start.
    pub fn new(anchor: DateTime<FixedOffset>) -> Self {
        Self {
            anchor,
            state: ClockState::default(),
        }
    }

    pub fn anchor(&self) -> DateTime<FixedOffset> {
        self.anchor
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Observe a stamp and return its absolute time
    ///
    /// The result is the anchor shifted by the elapsed days and hours, with
    /// its minute and second replaced by the stamp.
    pub fn advance(&mut self, stamp: MinuteSecond) -> DateTime<FixedOffset> {
        self.state.observe(stamp);
        self.resolve(stamp)
    }

    /// Parse a raw `mm:ss` token, then [`advance`](Self::advance)
    pub fn advance_raw(&mut self, raw: &str) -> Result<DateTime<FixedOffset>> {
        let stamp = raw.parse()?;
        Ok(self.advance(stamp))
    }

    /// Absolute time of a stamp under the current offsets, without observing it
    pub fn resolve(&self, stamp: MinuteSecond) -> DateTime<FixedOffset> {
        let top_of_hour = self.anchor
            - Duration::minutes(i64::from(self.anchor.minute()))
            - Duration::seconds(i64::from(self.anchor.second()))
            - Duration::nanoseconds(i64::from(self.anchor.nanosecond()));

        top_of_hour
            + Duration::hours(self.state.elapsed_hours())
            + Duration::minutes(i64::from(stamp.minute))
            + Duration::seconds(i64::from(stamp.second))
    }
}
