//! The round-based earliest-arrival router.

use hashbrown::{HashMap, HashSet};
use log::debug;

use super::journey::{reconstruct, Movement};
use super::state::RaptorState;
use crate::model::Schedule;
use crate::transfers::TransferManager;
use crate::{Error, RouteId, StopId, Time};

/// Answers earliest-arrival queries over a schedule.
///
/// The search runs in rounds; round `k` finds the best arrivals reachable
/// with at most `k` public-transport legs. Each round scans only the routes
/// serving stops improved in the previous round, then relaxes walking
/// transfers from the stops improved in this round. The loop ends when a
/// round improves nothing.
pub struct Router<'a> {
    schedule: &'a Schedule,
    transfer_manager: TransferManager,
    routes_serving_stop: Vec<Vec<(RouteId, usize)>>,
}

impl<'a> Router<'a> {
    /// Precomputes, per stop, the routes calling there together with the
    /// stop's position in each route. A route visiting a stop twice yields
    /// two entries.
    pub fn new(schedule: &'a Schedule, transfer_manager: TransferManager) -> Self {
        let mut routes_serving_stop = vec![Vec::new(); schedule.get_stops().len()];
        for (route_id, route) in schedule.get_routes().iter().enumerate() {
            for (stop_idx, &stop) in route.stop_sequence().iter().enumerate() {
                routes_serving_stop[stop].push((route_id, stop_idx));
            }
        }
        Self {
            schedule,
            transfer_manager,
            routes_serving_stop,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        self.schedule
    }

    /// Computes the earliest-arrival journey from `origin` to `destination`
    /// leaving no earlier than `departure_time`.
    ///
    /// The returned movements are chronological; an empty vector means no
    /// journey exists.
    pub fn route(
        &self,
        origin: StopId,
        destination: StopId,
        departure_time: Time,
    ) -> Result<Vec<Movement>, Error> {
        let n_stops = self.schedule.get_stops().len();
        if origin >= n_stops {
            return Err(Error::UnknownStop(origin));
        }
        if destination >= n_stops {
            return Err(Error::UnknownStop(destination));
        }

        let mut state = RaptorState::new(origin, destination, departure_time);
        // Seed the stops reachable on foot from the origin; without this,
        // journeys starting with a walk are never found.
        self.relax_transfers(&mut state);

        while state.have_stops_to_improve() {
            let round = state.new_round();
            let queue = self.collect_routes(&state.take_improved_stops());
            debug!("round {round}: scanning {} routes", queue.len());
            for &(route_id, hop_on_idx) in &queue {
                self.scan_route(route_id, hop_on_idx, &mut state);
            }
            self.relax_transfers(&mut state);
        }

        reconstruct(self.schedule, &state, destination)
    }

    /// Routes serving any improved stop, each with the smallest position at
    /// which it can be boarded. Sorted for a reproducible scan order.
    fn collect_routes(&self, improved_stops: &HashSet<StopId>) -> Vec<(RouteId, usize)> {
        let mut queue: HashMap<RouteId, usize> = HashMap::new();
        for &stop in improved_stops {
            for &(route_id, stop_idx) in &self.routes_serving_stop[stop] {
                queue
                    .entry(route_id)
                    .and_modify(|existing| *existing = (*existing).min(stop_idx))
                    .or_insert(stop_idx);
            }
        }
        let mut queue: Vec<(RouteId, usize)> = queue.into_iter().collect();
        queue.sort_unstable();
        queue
    }

    /// Rides along a route starting at `hop_on_idx`, improving every stop
    /// the trip reaches. When a stop was reached faster in the previous
    /// round, the scan may hop onto an earlier trip of the same route.
    fn scan_route(&self, route_id: RouteId, hop_on_idx: usize, state: &mut RaptorState) {
        let route = self.schedule.route(route_id);
        let sequence = route.stop_sequence();

        let Some(hop_on_time) = state.previous_arrival_time_to_stop(sequence[hop_on_idx]) else {
            return;
        };
        let Some(mut trip_idx) = route.earliest_trip_at(hop_on_idx, hop_on_time) else {
            return;
        };
        let mut boarding_idx = hop_on_idx;

        for stop_idx in hop_on_idx + 1..sequence.len() {
            let stop = sequence[stop_idx];
            let stop_time = &route.trips()[trip_idx].stop_times()[stop_idx];
            let improved = state.try_improve(
                stop,
                stop_time.arrival_time(),
                Some(sequence[boarding_idx]),
                Some((route_id, trip_idx)),
            );
            if !improved && state.might_catch_earlier_trip(stop, stop_time.departure_time()) {
                if let Some(previous_arrival) = state.previous_arrival_time_to_stop(stop) {
                    if let Some(earlier) = route.earliest_trip_at(stop_idx, previous_arrival) {
                        if earlier != trip_idx {
                            trip_idx = earlier;
                            boarding_idx = stop_idx;
                        }
                    }
                }
            }
        }
    }

    /// Walks from every stop improved in this round to its transfer
    /// neighbours. Transfers stay within the round: walking is not a
    /// public-transport leg.
    fn relax_transfers(&self, state: &mut RaptorState) {
        let mut improved: Vec<StopId> = state.improved_stops().iter().copied().collect();
        improved.sort_unstable();
        for from_stop in improved {
            let Some(from_arrival) = state.current_arrival_time_to_stop(from_stop) else {
                continue;
            };
            for &(to_stop, duration) in self.transfer_manager.transfers_from(from_stop) {
                state.try_improve(to_stop, from_arrival + duration, Some(from_stop), None);
            }
        }
    }
}
