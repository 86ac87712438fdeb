//! Per-query state of the round-based search.

use hashbrown::{HashMap, HashSet};

use crate::{RouteId, StopId, Time, TripIndex};

/// How a stop was reached in a round.
///
/// A public-transport leg carries the route and trip it rode; a walking leg
/// carries no leg information. The origin of the journey has no boarding
/// stop.
#[derive(Debug, Clone, Copy)]
pub struct Label {
    pub arrival_time: Time,
    pub boarding_stop: Option<StopId>,
    pub pt_leg: Option<(RouteId, TripIndex)>,
}

/// Keeps the labels of the current round and a snapshot of the previous
/// round's labels. All modifications apply to the current set.
#[derive(Debug, Default)]
pub struct LabelManager {
    current_round_labels: HashMap<StopId, Label>,
    previous_round_labels: HashMap<StopId, Label>,
}

impl LabelManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_label(
        &mut self,
        stop: StopId,
        arrival_time: Time,
        boarding_stop: Option<StopId>,
        pt_leg: Option<(RouteId, TripIndex)>,
    ) {
        self.current_round_labels.insert(
            stop,
            Label {
                arrival_time,
                boarding_stop,
                pt_leg,
            },
        );
    }

    /// Snapshots the current labels as the previous round. The current
    /// labels stay in place: a round starts from the best labels so far.
    pub fn new_round(&mut self) {
        self.previous_round_labels = self.current_round_labels.clone();
    }

    pub fn latest(&self, stop: StopId) -> Option<Label> {
        self.current_round_labels.get(&stop).copied()
    }

    pub fn previous(&self, stop: StopId) -> Option<Label> {
        self.previous_round_labels.get(&stop).copied()
    }
}

/// Mutable state of a single query.
///
/// The search proceeds in rounds; the round number counts the
/// public-transport legs used so far. Walking between stops does not open a
/// new round.
#[derive(Debug)]
pub struct RaptorState {
    labels: LabelManager,
    earliest_arrival_time: HashMap<StopId, Time>,
    improved_stops: HashSet<StopId>,
    n_round: u32,
    destination: StopId,
}

impl RaptorState {
    /// Starts at round 0 with a single label at the origin.
    pub fn new(origin: StopId, destination: StopId, departure_time: Time) -> Self {
        let mut labels = LabelManager::new();
        labels.add_label(origin, departure_time, None, None);
        let mut earliest_arrival_time = HashMap::new();
        earliest_arrival_time.insert(origin, departure_time);
        let mut improved_stops = HashSet::new();
        improved_stops.insert(origin);
        Self {
            labels,
            earliest_arrival_time,
            improved_stops,
            n_round: 0,
            destination,
        }
    }

    /// An update is accepted only if it beats both the best known arrival at
    /// the stop and the best known arrival at the destination, strictly.
    /// Equal times never replace an existing label, which keeps results
    /// deterministic under a stable scan order.
    fn can_improve(&self, new_arrival_time: Time, stop: StopId) -> bool {
        if let Some(&best) = self.earliest_arrival_time.get(&stop) {
            if new_arrival_time >= best {
                return false;
            }
        }
        match self.earliest_arrival_time.get(&self.destination) {
            Some(&destination_best) => new_arrival_time < destination_best,
            None => true,
        }
    }

    /// Attempts to improve the arrival time at a stop. On success the label
    /// is written, the earliest-arrival table updated and the stop marked
    /// improved.
    pub fn try_improve(
        &mut self,
        stop: StopId,
        new_arrival_time: Time,
        boarding_stop: Option<StopId>,
        pt_leg: Option<(RouteId, TripIndex)>,
    ) -> bool {
        if !self.can_improve(new_arrival_time, stop) {
            return false;
        }
        self.labels
            .add_label(stop, new_arrival_time, boarding_stop, pt_leg);
        self.earliest_arrival_time.insert(stop, new_arrival_time);
        self.improved_stops.insert(stop);
        true
    }

    /// Starts a new round and returns its number.
    pub fn new_round(&mut self) -> u32 {
        self.n_round += 1;
        self.labels.new_round();
        self.n_round
    }

    pub fn n_round(&self) -> u32 {
        self.n_round
    }

    pub fn have_stops_to_improve(&self) -> bool {
        !self.improved_stops.is_empty()
    }

    /// True when the previous round reached `stop` no later than the given
    /// departure: an earlier trip might then be boardable there. Arriving
    /// exactly at the departure still allows boarding.
    pub fn might_catch_earlier_trip(&self, stop: StopId, departure_time: Time) -> bool {
        self.labels
            .previous(stop)
            .is_some_and(|label| label.arrival_time <= departure_time)
    }

    /// Empties and returns the set of stops improved since the last call.
    pub fn take_improved_stops(&mut self) -> HashSet<StopId> {
        std::mem::take(&mut self.improved_stops)
    }

    /// The stops improved in the current round, without clearing them.
    pub fn improved_stops(&self) -> &HashSet<StopId> {
        &self.improved_stops
    }

    /// Best arrival known across all rounds.
    pub fn current_arrival_time_to_stop(&self, stop: StopId) -> Option<Time> {
        self.earliest_arrival_time.get(&stop).copied()
    }

    /// Arrival at the stop using one transfer less than the current round.
    pub fn previous_arrival_time_to_stop(&self, stop: StopId) -> Option<Time> {
        self.labels.previous(stop).map(|label| label.arrival_time)
    }

    pub fn latest_label(&self, stop: StopId) -> Option<Label> {
        self.labels.latest(stop)
    }
}
