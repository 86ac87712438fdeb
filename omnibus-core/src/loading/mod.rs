//! Loading of GTFS-shaped data and construction of the schedule model.

mod builder;
pub mod calendar;
pub mod feed;

pub use builder::build_schedule;
pub use calendar::expand_services;
pub use feed::{
    read_gtfs_dir, CalendarAvailability, CalendarException, FeedAgency, FeedCalendar,
    FeedCalendarDate, FeedRoute, FeedStop, FeedStopTime, FeedTrip, GtfsFeed, LocationType,
};
