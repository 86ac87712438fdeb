//! Schedule-based public transit journey planning.
//!
//! The crate builds a query-optimised in-memory model of a GTFS timetable,
//! precomputes a walking transfer graph between stops, and answers
//! earliest-arrival queries with a round-based RAPTOR router.
//!
//! A typical session:
//!
//! ```no_run
//! use omnibus_core::prelude::*;
//!
//! # fn main() -> Result<(), omnibus_core::Error> {
//! let feed = read_gtfs_dir("feed/".as_ref())?;
//! let schedule = build_schedule(feed, None, None)?;
//!
//! let transfers = TransferManager::new(
//!     schedule.stop_manager(),
//!     &SpatialStopIndex::factory(),
//!     &LinearWalkingTimeCalculator::new(5.0)?,
//!     TransferManagerParameters::default(),
//! );
//! let router = Router::new(&schedule, transfers);
//!
//! let origin = schedule.find_stop("9021").unwrap();
//! let destination = schedule.find_stop("9430").unwrap();
//! # let departure = unimplemented!();
//! let journey = router.route(origin, destination, departure)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod transfers;

pub use error::Error;

/// An absolute instant bound to an IANA time zone.
///
/// Ordering and equality compare the underlying instant, so stop times from
/// agencies in different zones stay comparable.
pub type Time = chrono::DateTime<chrono_tz::Tz>;

/// Index of a stop in the schedule's stop arena.
pub type StopId = usize;

/// Index of a station in the schedule's station arena.
pub type StationId = usize;

/// Index of an agency in the schedule's agency arena.
pub type AgencyId = usize;

/// Index of a route in the schedule's route list.
pub type RouteId = usize;

/// Index of a trip within its route, after sorting by first-stop departure.
pub type TripIndex = usize;
