//! Conversion of GTFS wall-clock times into absolute instants.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::{Error, Time};

/// A GTFS time of day, measured from midnight of the service day.
///
/// Hours may exceed 24 to describe trips that run past midnight on the
/// service day they belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GtfsTime {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl GtfsTime {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Offset from midnight of the service day.
    pub fn as_duration(&self) -> Duration {
        Duration::seconds(i64::from(self.hours) * 3600 + i64::from(self.minutes) * 60 + i64::from(self.seconds))
    }
}

impl FromStr for GtfsTime {
    type Err = Error;

    /// Parses `HH:MM:SS` (or `H:MM:SS`); hours may be 24 or more.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let mut next = || {
            parts
                .next()
                .and_then(|p| p.trim().parse::<u32>().ok())
                .ok_or_else(|| Error::InconsistentFeed(format!("invalid GTFS time '{s}'")))
        };
        let hours = next()?;
        let minutes = next()?;
        let seconds = next()?;
        if minutes > 59 || seconds > 59 || parts.next().is_some() {
            return Err(Error::InconsistentFeed(format!("invalid GTFS time '{s}'")));
        }
        Ok(Self::new(hours, minutes, seconds))
    }
}

impl fmt::Display for GtfsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Combines a GTFS time with a service day and a zone into an absolute
/// instant: midnight of the service day plus the time's offset, resolved in
/// the given zone.
///
/// At DST transitions the earliest interpretation wins: an ambiguous local
/// time maps to the earlier of the two instants, and a local time skipped by
/// a clock jump is pushed past the gap, preserving the offset from midnight.
pub fn local_time_on_service_day(
    time: &GtfsTime,
    service_day: NaiveDate,
    time_zone: Tz,
) -> Result<Time, Error> {
    let local = service_day
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        + time.as_duration();
    resolve_local_earliest(time_zone, local)
}

fn resolve_local_earliest(time_zone: Tz, local: NaiveDateTime) -> Result<Time, Error> {
    match time_zone.from_local_datetime(&local) {
        LocalResult::Single(instant) => Ok(instant),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => {
            // Skipped by a forward clock jump; no gap in the IANA database
            // is longer than an hour.
            let shifted = local + Duration::hours(1);
            match time_zone.from_local_datetime(&shifted) {
                LocalResult::Single(instant) => Ok(instant),
                LocalResult::Ambiguous(earliest, _) => Ok(earliest),
                LocalResult::None => Err(Error::InconsistentFeed(format!(
                    "local time {local} cannot be resolved in zone {time_zone}"
                ))),
            }
        }
    }
}
