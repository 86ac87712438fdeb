//! Data model for the transit schedule.
//!
//! All entities live in arenas owned by the [`Schedule`] and reference each
//! other through plain indices (`StopId`, `RouteId`, ...).

pub mod agency;
pub mod route;
pub mod schedule;
pub mod stops;
pub mod time;
pub mod trip;

pub use agency::Agency;
pub use route::Route;
pub use schedule::Schedule;
pub use stops::{BaseStop, BoardingArea, Station, StationEntrance, Stop, StopManager};
pub use time::GtfsTime;
pub use trip::{Service, StopTime, Trip};
