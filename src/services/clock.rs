use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// A position on the game clock, encoded on the wire as `MM.SS`.
///
/// Internally everything is total seconds; the string form only exists at
/// the boundaries (request payloads, Redis values, the `minute` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameTime {
    total_secs: u32,
}

pub const FULL_TIME: GameTime = GameTime { total_secs: 48 * 60 };
pub const TIP_OFF: GameTime = GameTime { total_secs: 0 };

impl GameTime {
    pub fn from_parts(minutes: u32, seconds: u32) -> Self {
        GameTime {
            total_secs: minutes * 60 + seconds,
        }
    }

    pub fn from_secs(total_secs: u32) -> Self {
        GameTime { total_secs }
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn minutes(&self) -> u32 {
        self.total_secs / 60
    }

    pub fn seconds(&self) -> u32 {
        self.total_secs % 60
    }

    /// Parses an `MM.SS` value. A bare integer (no dot) is read as whole
    /// minutes. Seconds must stay below 60 and the result may not pass
    /// the 48-minute mark.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let (min_part, sec_part) = match s.split_once('.') {
            Some((m, sec)) => (m, Some(sec)),
            None => (s, None),
        };

        let minutes: u32 = min_part
            .parse()
            .map_err(|_| format!("'{}' is not a valid game time", s))?;
        let seconds: u32 = match sec_part {
            Some(sec) => sec
                .parse()
                .map_err(|_| format!("'{}' is not a valid game time", s))?,
            None => 0,
        };

        if seconds >= 60 {
            return Err(format!("'{}' has more than 59 seconds", s));
        }

        let gt = GameTime::from_parts(minutes, seconds);
        if gt > FULL_TIME {
            return Err(format!("'{}' is past the 48 minute mark", s));
        }
        Ok(gt)
    }

    /// Renders back to `MM.SS` with both fields zero padded.
    pub fn encode(&self) -> String {
        format!("{:02}.{:02}", self.minutes(), self.seconds())
    }

    /// Elapsed time from `self` to `later`, saturating at zero.
    pub fn diff(&self, later: GameTime) -> GameTime {
        GameTime {
            total_secs: later.total_secs.saturating_sub(self.total_secs),
        }
    }

    pub fn add(&self, other: GameTime) -> GameTime {
        GameTime {
            total_secs: self.total_secs + other.total_secs,
        }
    }

    /// The REAL-column encoding used by `matches_stats.minute`:
    /// `12.30` means twelve minutes thirty seconds.
    pub fn as_minute_real(&self) -> f64 {
        self.minutes() as f64 + self.seconds() as f64 / 100.0
    }

    /// Reads the REAL-column encoding back. Rounds the fractional part to
    /// absorb float noise from the round trip through Postgres.
    pub fn from_minute_real(v: f64) -> Result<Self, String> {
        if !(0.0..=48.0).contains(&v) {
            return Err(format!("{} is outside the game clock", v));
        }
        let minutes = v.trunc() as u32;
        let seconds = ((v - v.trunc()) * 100.0).round() as u32;
        if seconds >= 60 {
            return Err(format!("{} has more than 59 seconds", v));
        }
        Ok(GameTime::from_parts(minutes, seconds))
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl Serialize for GameTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for GameTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GameTimeVisitor;

        impl<'de> Visitor<'de> for GameTimeVisitor {
            type Value = GameTime;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a game time string in MM.SS form")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<GameTime, E> {
                GameTime::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(GameTimeVisitor)
    }
}
