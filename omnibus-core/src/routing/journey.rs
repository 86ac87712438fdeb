//! Journey reconstruction from search labels.

use crate::model::Schedule;
use crate::routing::state::RaptorState;
use crate::{Error, RouteId, StopId, Time, TripIndex};

/// One step of a journey: either riding a trip or walking between stops.
#[derive(Debug, Clone)]
pub enum Movement {
    Pt(PtMovement),
    Walking(WalkingMovement),
}

impl Movement {
    pub fn from_stop(&self, schedule: &Schedule) -> StopId {
        match self {
            Movement::Pt(pt) => pt.from_stop(schedule),
            Movement::Walking(walk) => walk.from_stop,
        }
    }

    pub fn to_stop(&self, schedule: &Schedule) -> StopId {
        match self {
            Movement::Pt(pt) => pt.to_stop(schedule),
            Movement::Walking(walk) => walk.to_stop,
        }
    }

    pub fn arrival_time(&self, schedule: &Schedule) -> Time {
        match self {
            Movement::Pt(pt) => pt.arrival_time(schedule),
            Movement::Walking(walk) => walk.arrival_time,
        }
    }
}

/// A ride on one trip, from one position in the route's stop sequence to a
/// later one.
#[derive(Debug, Clone)]
pub struct PtMovement {
    pub route: RouteId,
    pub trip: TripIndex,
    pub from_stop_idx: usize,
    pub to_stop_idx: usize,
    pub shape_id: Option<String>,
}

impl PtMovement {
    pub fn from_stop(&self, schedule: &Schedule) -> StopId {
        schedule.route(self.route).stop_sequence()[self.from_stop_idx]
    }

    pub fn to_stop(&self, schedule: &Schedule) -> StopId {
        schedule.route(self.route).stop_sequence()[self.to_stop_idx]
    }

    pub fn departure_time(&self, schedule: &Schedule) -> Time {
        schedule.route(self.route).trips()[self.trip].stop_times()[self.from_stop_idx]
            .departure_time()
    }

    pub fn arrival_time(&self, schedule: &Schedule) -> Time {
        schedule.route(self.route).trips()[self.trip].stop_times()[self.to_stop_idx].arrival_time()
    }
}

/// A walk between two stops, arriving at the given instant.
#[derive(Debug, Clone)]
pub struct WalkingMovement {
    pub from_stop: StopId,
    pub to_stop: StopId,
    pub arrival_time: Time,
}

/// Walks the labels backwards from the destination and emits the movements
/// in chronological order. An unreachable destination yields an empty
/// journey.
pub(crate) fn reconstruct(
    schedule: &Schedule,
    state: &RaptorState,
    destination: StopId,
) -> Result<Vec<Movement>, Error> {
    let mut movements = Vec::new();
    let mut current_stop = destination;
    let Some(mut label) = state.latest_label(current_stop) else {
        return Ok(movements);
    };

    while let Some(boarding_stop) = label.boarding_stop {
        match label.pt_leg {
            Some((route_id, trip_index)) => {
                let route = schedule.route(route_id);
                let sequence = route.stop_sequence();
                let from_stop_idx = sequence
                    .iter()
                    .position(|&stop| stop == boarding_stop)
                    .ok_or(Error::InvalidJourney)?;
                // If the route visits a stop twice, take the first call
                // after the boarding position.
                let to_stop_idx = sequence[from_stop_idx + 1..]
                    .iter()
                    .position(|&stop| stop == current_stop)
                    .map(|offset| from_stop_idx + 1 + offset)
                    .ok_or(Error::InvalidJourney)?;
                let shape_id = route.trips()[trip_index].shape_id().map(str::to_owned);
                movements.push(Movement::Pt(PtMovement {
                    route: route_id,
                    trip: trip_index,
                    from_stop_idx,
                    to_stop_idx,
                    shape_id,
                }));
            }
            None => {
                movements.push(Movement::Walking(WalkingMovement {
                    from_stop: boarding_stop,
                    to_stop: current_stop,
                    arrival_time: label.arrival_time,
                }));
            }
        }
        current_stop = boarding_stop;
        label = state.latest_label(current_stop).ok_or(Error::InvalidJourney)?;
    }

    movements.reverse();
    Ok(movements)
}
