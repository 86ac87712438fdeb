//! Raw GTFS-shaped tables as delivered by a feed parser.
//!
//! The schedule builder consumes these rows; where they come from is the
//! caller's concern. [`read_gtfs_dir`] covers the common case of a directory
//! of GTFS text files. Rows that fail to deserialize are skipped, matching
//! the lenient handling real-world feeds need.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::model::GtfsTime;
use crate::Error;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedAgency {
    pub agency_id: String,
    pub agency_name: String,
    pub agency_url: String,
    pub agency_timezone: String,
}

/// Kind of point a `stops.txt` row describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LocationType {
    #[default]
    Platform,
    Station,
    Entrance,
    Node,
    BoardingArea,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
    #[serde(deserialize_with = "deserialize_location_type")]
    pub location_type: LocationType,
    pub parent_station: String,
    pub platform_code: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalendarAvailability {
    Available,
    #[default]
    NotAvailable,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedCalendar {
    pub service_id: String,
    #[serde(deserialize_with = "deserialize_availability")]
    pub monday: CalendarAvailability,
    #[serde(deserialize_with = "deserialize_availability")]
    pub tuesday: CalendarAvailability,
    #[serde(deserialize_with = "deserialize_availability")]
    pub wednesday: CalendarAvailability,
    #[serde(deserialize_with = "deserialize_availability")]
    pub thursday: CalendarAvailability,
    #[serde(deserialize_with = "deserialize_availability")]
    pub friday: CalendarAvailability,
    #[serde(deserialize_with = "deserialize_availability")]
    pub saturday: CalendarAvailability,
    #[serde(deserialize_with = "deserialize_availability")]
    pub sunday: CalendarAvailability,
    #[serde(deserialize_with = "deserialize_gtfs_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "deserialize_gtfs_date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalendarException {
    #[default]
    Added,
    Removed,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedCalendarDate {
    pub service_id: String,
    #[serde(deserialize_with = "deserialize_gtfs_date")]
    pub date: Option<NaiveDate>,
    #[serde(deserialize_with = "deserialize_exception")]
    pub exception_type: CalendarException,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedRoute {
    pub route_id: String,
    pub agency_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeedTrip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    pub shape_id: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedStopTime {
    pub trip_id: String,
    #[serde(deserialize_with = "deserialize_gtfs_time")]
    pub arrival_time: GtfsTime,
    #[serde(deserialize_with = "deserialize_gtfs_time")]
    pub departure_time: GtfsTime,
    pub stop_id: String,
    pub stop_sequence: u32,
}

/// The seven tables the schedule builder consumes.
#[derive(Debug, Default)]
pub struct GtfsFeed {
    pub agencies: Vec<FeedAgency>,
    pub stops: Vec<FeedStop>,
    pub calendar: Vec<FeedCalendar>,
    pub calendar_dates: Vec<FeedCalendarDate>,
    pub routes: Vec<FeedRoute>,
    pub trips: Vec<FeedTrip>,
    pub stop_times: Vec<FeedStopTime>,
}

/// Reads the GTFS text tables from a directory. `calendar_dates.txt` may be
/// absent; all other tables are required.
pub fn read_gtfs_dir(dir: &Path) -> Result<GtfsFeed, Error> {
    let calendar_dates_path = dir.join("calendar_dates.txt");
    Ok(GtfsFeed {
        agencies: deserialize_gtfs_file(&dir.join("agency.txt"))?,
        stops: deserialize_gtfs_file(&dir.join("stops.txt"))?,
        calendar: deserialize_gtfs_file(&dir.join("calendar.txt"))?,
        calendar_dates: if calendar_dates_path.exists() {
            deserialize_gtfs_file(&calendar_dates_path)?
        } else {
            Vec::new()
        },
        routes: deserialize_gtfs_file(&dir.join("routes.txt"))?,
        trips: deserialize_gtfs_file(&dir.join("trips.txt"))?,
        stop_times: deserialize_gtfs_file(&dir.join("stop_times.txt"))?,
    })
}

fn deserialize_gtfs_file<T>(path: &Path) -> Result<Vec<T>, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("failed to open file '{}': {}", path.display(), e),
        )
    })?;
    Ok(csv::Reader::from_reader(file)
        .deserialize()
        .filter_map(Result::ok)
        .collect())
}

fn deserialize_gtfs_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let date_str = String::deserialize(deserializer)?;
    if date_str.is_empty() {
        Ok(None)
    } else {
        NaiveDate::parse_from_str(&date_str, "%Y%m%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

fn deserialize_gtfs_time<'de, D>(deserializer: D) -> Result<GtfsTime, D::Error>
where
    D: Deserializer<'de>,
{
    let time_str = String::deserialize(deserializer)?;
    time_str.parse().map_err(serde::de::Error::custom)
}

fn deserialize_location_type<'de, D>(deserializer: D) -> Result<LocationType, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    match value.trim() {
        "" | "0" => Ok(LocationType::Platform),
        "1" => Ok(LocationType::Station),
        "2" => Ok(LocationType::Entrance),
        "3" => Ok(LocationType::Node),
        "4" => Ok(LocationType::BoardingArea),
        other => Err(serde::de::Error::custom(format!(
            "unknown location_type '{other}'"
        ))),
    }
}

fn deserialize_availability<'de, D>(deserializer: D) -> Result<CalendarAvailability, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    match value.trim() {
        "1" => Ok(CalendarAvailability::Available),
        "" | "0" => Ok(CalendarAvailability::NotAvailable),
        other => Err(serde::de::Error::custom(format!(
            "unknown calendar availability '{other}'"
        ))),
    }
}

fn deserialize_exception<'de, D>(deserializer: D) -> Result<CalendarException, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    match value.trim() {
        "1" => Ok(CalendarException::Added),
        "2" => Ok(CalendarException::Removed),
        other => Err(serde::de::Error::custom(format!(
            "unknown calendar exception type '{other}'"
        ))),
    }
}
