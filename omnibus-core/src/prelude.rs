//! Re-export of the public API surface.

pub use crate::error::Error;
pub use crate::loading::{build_schedule, read_gtfs_dir, GtfsFeed};
pub use crate::model::{
    Agency, BaseStop, GtfsTime, Route, Schedule, Station, Stop, StopManager, StopTime, Trip,
};
pub use crate::routing::{Movement, PtMovement, Router, WalkingMovement};
pub use crate::transfers::{
    LinearWalkingTimeCalculator, NearbyStopsFinder, NearbyStopsFinderFactory, SpatialStopIndex,
    StopWithDistance, TransferManager, TransferManagerParameters, WalkingTimeCalculator,
};
pub use crate::{AgencyId, RouteId, StationId, StopId, Time, TripIndex};
