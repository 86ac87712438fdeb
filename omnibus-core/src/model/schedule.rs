use crate::{AgencyId, RouteId, StopId};

use super::agency::Agency;
use super::route::Route;
use super::stops::{Stop, StopManager};

/// Immutable owner of the whole timetable: agencies, stops and stations,
/// and the routes grouping all instantiated trips.
///
/// Every other component borrows into the schedule or refers to its arenas
/// by index, so a schedule can be shared freely between concurrent queries.
#[derive(Debug)]
pub struct Schedule {
    agencies: Vec<Agency>,
    stops: StopManager,
    routes: Vec<Route>,
}

impl Schedule {
    pub fn new(agencies: Vec<Agency>, stops: StopManager, routes: Vec<Route>) -> Self {
        Self {
            agencies,
            stops,
            routes,
        }
    }

    pub fn get_stops(&self) -> &[Stop] {
        self.stops.stops()
    }

    pub fn get_routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn stop_manager(&self) -> &StopManager {
        &self.stops
    }

    pub fn agencies(&self) -> &[Agency] {
        &self.agencies
    }

    pub fn agency(&self, id: AgencyId) -> &Agency {
        &self.agencies[id]
    }

    pub fn stop(&self, id: StopId) -> &Stop {
        self.stops.stop(id)
    }

    pub fn route(&self, id: RouteId) -> &Route {
        &self.routes[id]
    }

    pub fn find_stop(&self, gtfs_id: &str) -> Option<StopId> {
        self.stops.find_stop(gtfs_id)
    }
}
