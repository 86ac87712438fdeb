//! Trips, their stop times and the services that schedule them.

use std::hash::{Hash, Hasher};

use chrono::NaiveDate;

use crate::{Error, StopId, Time};

/// A vehicle arriving at and departing from one stop.
///
/// Both instants are absolute; the arrival never comes after the departure.
#[derive(Debug, Clone, Copy)]
pub struct StopTime {
    arrival_time: Time,
    departure_time: Time,
    stop: StopId,
}

impl StopTime {
    pub fn new(arrival_time: Time, departure_time: Time, stop: StopId) -> Self {
        debug_assert!(arrival_time <= departure_time);
        Self {
            arrival_time,
            departure_time,
            stop,
        }
    }

    pub fn arrival_time(&self) -> Time {
        self.arrival_time
    }

    pub fn departure_time(&self) -> Time {
        self.departure_time
    }

    pub fn stop(&self) -> StopId {
        self.stop
    }
}

/// The concrete dates on which a GTFS service runs. Only used while building
/// the schedule; not retained afterwards.
#[derive(Debug, Clone)]
pub struct Service {
    gtfs_id: String,
    active_days: Vec<NaiveDate>,
}

impl Service {
    pub fn new(gtfs_id: String, active_days: Vec<NaiveDate>) -> Self {
        Self {
            gtfs_id,
            active_days,
        }
    }

    pub fn gtfs_id(&self) -> &str {
        &self.gtfs_id
    }

    pub fn active_days(&self) -> &[NaiveDate] {
        &self.active_days
    }

    pub(crate) fn active_days_mut(&mut self) -> &mut Vec<NaiveDate> {
        &mut self.active_days
    }
}

impl PartialEq for Service {
    fn eq(&self, other: &Self) -> bool {
        self.gtfs_id == other.gtfs_id
    }
}

impl Eq for Service {}

/// A journey made by a specific vehicle on a specific date.
///
/// The same GTFS trip instantiated on two service days yields two distinct
/// trips, so equality considers the first-stop departure instant in addition
/// to the GTFS id.
#[derive(Debug, Clone)]
pub struct Trip {
    stop_times: Vec<StopTime>,
    gtfs_id: String,
    shape_id: Option<String>,
}

impl Trip {
    /// A trip must call at least one stop.
    pub fn new(
        stop_times: Vec<StopTime>,
        gtfs_id: String,
        shape_id: Option<String>,
    ) -> Result<Self, Error> {
        if stop_times.is_empty() {
            return Err(Error::InconsistentFeed(format!(
                "trip '{gtfs_id}' has no stop times"
            )));
        }
        debug_assert!(stop_times
            .windows(2)
            .all(|w| w[0].arrival_time() <= w[1].arrival_time()
                && w[0].departure_time() <= w[1].departure_time()));
        Ok(Self {
            stop_times,
            gtfs_id,
            shape_id,
        })
    }

    pub fn stop_times(&self) -> &[StopTime] {
        &self.stop_times
    }

    pub fn gtfs_id(&self) -> &str {
        &self.gtfs_id
    }

    pub fn shape_id(&self) -> Option<&str> {
        self.shape_id.as_deref()
    }

    /// Departure instant of this particular instantiation of the trip.
    pub fn departure_time(&self) -> Time {
        self.stop_times[0].departure_time()
    }
}

impl PartialEq for Trip {
    fn eq(&self, other: &Self) -> bool {
        self.gtfs_id == other.gtfs_id && self.departure_time() == other.departure_time()
    }
}

impl Eq for Trip {}

impl Hash for Trip {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.gtfs_id.hash(state);
        self.departure_time().timestamp().hash(state);
    }
}
