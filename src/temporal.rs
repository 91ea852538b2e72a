//! Parsing and formatting of statement timestamps.
//!
//! Statements carry their times as ISO 8601 text. The accepted grammar is
//! deliberately loose: everything after the year is optional, as long as each
//! present component has all of its predecessors.
//!
//! ```text
//! YYYY[-MM[-DD[(T| )HH:mm[:ss[.fraction]][Z|±HH:mm]]]]
//! ```
//!
//! The grammar is not anchored: the first four digit year found starts the
//! match, the longest grammatical run from there is used and whatever follows
//! is ignored, so `2016-06-15T10:00:00+0200` reads as `2016-06-15T10:00:00`.
//!
//! Out-of-range fields overflow into the next unit the way calendar arithmetic
//! on date objects usually does, so `2016-02-30` is the first of March.
//! Formatting always yields the fixed-width UTC form `YYYY-MM-DDTHH:mm:ss.mmmZ`.

// used for the moment itself and for zone arithmetic
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
// the grammar is a single regular expression
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

// used to print out readable forms of a timestamp
use std::fmt;
// used when parsing a string to a Timestamp
use std::str::FromStr;

use crate::error::{Result, UtilError};

lazy_static! {
    static ref ISO_GRAMMAR: Regex = Regex::new(concat!(
        r"([0-9]{4})(?:-([0-9]{2})(?:-([0-9]{2})",
        r"(?:[T ]([0-9]{2}):([0-9]{2})(?::([0-9]{2})(?:\.([0-9]+))?)?",
        r"(?:Z|([-+])([0-9]{2}):([0-9]{2}))?)?)?)?"
    ))
    .unwrap();
}

// ------------- Timestamp -------------
/// An instant with millisecond precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    moment: DateTime<Utc>,
}

impl Timestamp {
    pub fn now() -> Self {
        Self::from(Utc::now())
    }
    /// Milliseconds since the Unix epoch, `None` outside the representable range.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|moment| Self { moment })
    }
    pub fn millis(&self) -> i64 {
        self.moment.timestamp_millis()
    }
    pub fn moment(&self) -> DateTime<Utc> {
        self.moment
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(moment: DateTime<Utc>) -> Self {
        let truncated = (moment.nanosecond() / 1_000_000) * 1_000_000;
        Self {
            moment: moment.with_nanosecond(truncated).unwrap_or(moment),
        }
    }
}
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.moment.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}
impl FromStr for Timestamp {
    type Err = UtilError;
    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(de::Error::custom)
    }
}

// ------------- Wall clock -------------
// The captured fields before any zone is applied. Kept signed and wide so that
// overflow can be resolved by plain arithmetic.
struct WallClock {
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
    millis: i64,
}

impl WallClock {
    fn from_captures(caps: &Captures) -> Option<Self> {
        let field = |i: usize, default: i64| -> Option<i64> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(default),
            }
        };
        Some(Self {
            year: field(1, 0)?,
            month: field(2, 1)?,
            day: field(3, 1)?,
            hour: field(4, 0)?,
            minute: field(5, 0)?,
            second: field(6, 0)?,
            millis: caps.get(7).map_or(Some(0), |m| fraction_millis(m.as_str()))?,
        })
    }

    fn to_naive(&self) -> Option<NaiveDateTime> {
        let months = self.year * 12 + (self.month - 1);
        let year = i32::try_from(months.div_euclid(12)).ok()?;
        let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;
        let first = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
        let elapsed = Duration::try_days(self.day - 1)?
            + Duration::try_hours(self.hour)?
            + Duration::try_minutes(self.minute)?
            + Duration::try_seconds(self.second)?
            + Duration::try_milliseconds(self.millis)?;
        first.checked_add_signed(elapsed)
    }
}

// "5" is half a second, "123456" is 123 ms.
fn fraction_millis(digits: &str) -> Option<i64> {
    let mut padded: String = digits.chars().take(3).collect();
    while padded.len() < 3 {
        padded.push('0');
    }
    padded.parse().ok()
}

// Offset named by the designator, in seconds west of UTC. Zero for `Z` or none.
fn designator_west(caps: &Captures) -> Option<i64> {
    let sign = match caps.get(8) {
        Some(s) => s.as_str(),
        None => return Some(0),
    };
    let hours: i64 = caps.get(9)?.as_str().parse().ok()?;
    let minutes: i64 = caps.get(10)?.as_str().parse().ok()?;
    let east = (hours * 60 + minutes) * 60;
    Some(if sign == "-" { east } else { -east })
}

// Reads the wall clock as local time in `zone`, giving the instant and the
// offset (seconds east) that zone applies at that instant.
fn localize<Tz: TimeZone>(wall: &NaiveDateTime, zone: &Tz) -> Option<(i64, i64)> {
    let local = match zone.from_local_datetime(wall) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => {
            // inside a gap, read with the offset in force before it
            let before = wall.checked_sub_signed(Duration::days(1))?;
            let offset = zone.offset_from_utc_datetime(&before).fix();
            let utc = wall.checked_sub_signed(Duration::seconds(offset.local_minus_utc().into()))?;
            zone.from_utc_datetime(&utc)
        }
    };
    let offset = i64::from(local.offset().fix().local_minus_utc());
    Some((local.timestamp_millis(), offset))
}

/// Parses a timestamp, reading designator-less times as UTC.
pub fn parse(text: &str) -> Result<Timestamp> {
    parse_in(text, &Utc)
}

/// Parses a timestamp by first building the wall clock as a local time in
/// `zone` and then re-basing it onto the explicit designator.
///
/// The correction added to the local instant is `designator - zone offset`,
/// both measured in minutes west of UTC. With `Utc` this reduces to reading the
/// fields directly; with `chrono::Local` it reproduces the locale-dependent
/// results some older producers rely on.
pub fn parse_in<Tz: TimeZone>(text: &str, zone: &Tz) -> Result<Timestamp> {
    let caps = ISO_GRAMMAR
        .captures(text.trim())
        .ok_or_else(|| UtilError::parse("not an ISO 8601 timestamp", text))?;
    let wall = WallClock::from_captures(&caps)
        .and_then(|w| w.to_naive())
        .ok_or_else(|| UtilError::parse("field out of range", text))?;
    let (local_millis, zone_east) = localize(&wall, zone)
        .ok_or_else(|| UtilError::parse("cannot place wall clock in zone", text))?;
    let explicit_west = designator_west(&caps)
        .ok_or_else(|| UtilError::parse("malformed offset", text))?;
    let correction = explicit_west + zone_east;
    debug!(%wall, correction, "re-based wall clock");
    Timestamp::from_millis(local_millis + correction * 1000)
        .ok_or_else(|| UtilError::parse("instant out of range", text))
}

/// The canonical `YYYY-MM-DDTHH:mm:ss.mmmZ` form.
pub fn format(instant: &Timestamp) -> String {
    instant.to_string()
}

/// Lenient date check: RFC 3339 and RFC 2822 first, since the statement
/// grammar would accept a bare year inside either, then the grammar.
pub fn coerce(text: &str) -> Option<Timestamp> {
    let trimmed = text.trim();
    let strict = DateTime::parse_from_rfc3339(trimmed).or_else(|_| DateTime::parse_from_rfc2822(trimmed));
    if let Ok(d) = strict {
        return Some(Timestamp::from(d.with_timezone(&Utc)));
    }
    match parse(text) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(input = text, error = %e, "invalid date string");
            None
        }
    }
}
