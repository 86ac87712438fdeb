//! Precomputation of the transfer graph.

use chrono::Duration;
use hashbrown::HashMap;
use log::info;
use rayon::prelude::*;

use super::finder::NearbyStopsFinderFactory;
use super::walk::WalkingTimeCalculator;
use crate::model::StopManager;
use crate::StopId;

/// Tuning knobs for transfer precomputation.
#[derive(Debug, Clone, Copy)]
pub struct TransferManagerParameters {
    /// Upper bound for on-foot transfers.
    pub max_radius_km: f64,
    /// Cost of changing platforms inside one station.
    pub in_station_transfer_duration: Duration,
    /// Fixed cost added once to every on-foot transfer, covering leaving
    /// and entering the stop areas.
    pub exit_station_duration: Duration,
}

impl Default for TransferManagerParameters {
    fn default() -> Self {
        Self {
            max_radius_km: 1.0,
            in_station_transfer_duration: Duration::seconds(60),
            exit_station_duration: Duration::seconds(120),
        }
    }
}

/// Holds the precomputed transfer graph as directed edges.
///
/// Two passes fill the map: same-station transfers first, then on-foot
/// transfers within the radius. The merge is idempotent; an on-foot edge
/// never replaces an existing same-station edge for the same pair.
///
/// The graph is symmetric in practice, but consumers must treat it as
/// directed and look up each direction separately.
#[derive(Debug)]
pub struct TransferManager {
    transfers: HashMap<StopId, Vec<(StopId, Duration)>>,
}

impl TransferManager {
    pub fn new(
        stops: &StopManager,
        finder_factory: &NearbyStopsFinderFactory,
        walk_calculator: &dyn WalkingTimeCalculator,
        parameters: TransferManagerParameters,
    ) -> Self {
        let mut transfers = HashMap::new();
        build_same_station_transfers(stops, &parameters, &mut transfers);
        build_on_foot_transfers(stops, finder_factory, walk_calculator, &parameters, &mut transfers);
        info!(
            "precomputed {} transfer edges from {} stops",
            transfers.values().map(Vec::len).sum::<usize>(),
            transfers.len()
        );
        Self { transfers }
    }

    /// Transfers leaving the given stop. Stops without transfers yield an
    /// empty slice.
    pub fn transfers_from(&self, stop: StopId) -> &[(StopId, Duration)] {
        self.transfers.get(&stop).map_or(&[], Vec::as_slice)
    }
}

fn build_same_station_transfers(
    stops: &StopManager,
    parameters: &TransferManagerParameters,
    transfers: &mut HashMap<StopId, Vec<(StopId, Duration)>>,
) {
    for station in stops.stations() {
        if station.stops().len() < 2 {
            continue;
        }
        for &from_stop in station.stops() {
            let list = transfers.entry(from_stop).or_default();
            for &to_stop in station.stops() {
                if to_stop != from_stop {
                    list.push((to_stop, parameters.in_station_transfer_duration));
                }
            }
        }
    }
}

fn build_on_foot_transfers(
    stops: &StopManager,
    finder_factory: &NearbyStopsFinderFactory,
    walk_calculator: &dyn WalkingTimeCalculator,
    parameters: &TransferManagerParameters,
    transfers: &mut HashMap<StopId, Vec<(StopId, Duration)>>,
) {
    let finder = finder_factory(stops.stops());

    let candidates: Vec<(StopId, Vec<(StopId, Duration)>)> = stops
        .stops()
        .par_iter()
        .enumerate()
        .map(|(origin, stop)| {
            let nearby = finder.stops_near_stop(
                origin,
                stop.latitude(),
                stop.longitude(),
                parameters.max_radius_km,
            );
            let edges = nearby
                .into_iter()
                .map(|found| {
                    let duration = walk_calculator.walking_time(found.distance_km)
                        + parameters.exit_station_duration;
                    (found.stop, duration)
                })
                .collect();
            (origin, edges)
        })
        .collect();

    for (origin, edges) in candidates {
        let existing = transfers.entry(origin).or_default();
        for (to_stop, duration) in edges {
            if existing.iter().all(|&(existing_to, _)| existing_to != to_stop) {
                existing.push((to_stop, duration));
            }
        }
    }
}
