//! Routes: groups of trips sharing one stop sequence and one GTFS route id.

use std::hash::{Hash, Hasher};

use crate::{AgencyId, StopId, Time, TripIndex};

use super::trip::Trip;

/// A collection of trips that call at exactly the same stops, in the same
/// order, and share a GTFS route id.
///
/// Trips are kept sorted by their first-stop departure. Together with the
/// FIFO property (no trip overtakes another), this ordering holds at every
/// stop of the route, which is what makes binary searching for the earliest
/// catchable trip correct.
#[derive(Debug, Clone)]
pub struct Route {
    trips: Vec<Trip>,
    stops: Vec<StopId>,
    short_name: String,
    long_name: String,
    gtfs_id: String,
    agency: AgencyId,
}

impl Route {
    /// Builds a route from its trips, sorting them by first-stop departure.
    ///
    /// # Panics
    ///
    /// If `trips` is empty. All trips are assumed to share the same stop
    /// sequence; the sequence is taken from the first trip.
    pub fn new(
        mut trips: Vec<Trip>,
        short_name: String,
        long_name: String,
        gtfs_id: String,
        agency: AgencyId,
    ) -> Self {
        assert!(!trips.is_empty(), "a route requires at least one trip");
        trips.sort_by_key(|trip| trip.departure_time());
        trips.shrink_to_fit();
        let stops = trips[0]
            .stop_times()
            .iter()
            .map(|stop_time| stop_time.stop())
            .collect();
        Self {
            trips,
            stops,
            short_name,
            long_name,
            gtfs_id,
            agency,
        }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// The ordered stops this route passes through. All trips share it.
    pub fn stop_sequence(&self) -> &[StopId] {
        &self.stops
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn gtfs_id(&self) -> &str {
        &self.gtfs_id
    }

    pub fn agency(&self) -> AgencyId {
        self.agency
    }

    /// Earliest trip whose departure at the given stop position is not
    /// before `earliest_departure`. Relies on the per-stop FIFO ordering.
    pub(crate) fn earliest_trip_at(
        &self,
        stop_idx: usize,
        earliest_departure: Time,
    ) -> Option<TripIndex> {
        let first = self
            .trips
            .partition_point(|trip| trip.stop_times()[stop_idx].departure_time() < earliest_departure);
        (first < self.trips.len()).then_some(first)
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.stops == other.stops && self.gtfs_id == other.gtfs_id
    }
}

impl Eq for Route {}

impl Hash for Route {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.stops.hash(state);
        self.gtfs_id.hash(state);
    }
}
