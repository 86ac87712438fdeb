use thiserror::Error;

use crate::StopId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("inconsistent feed: {0}")]
    InconsistentFeed(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("unknown stop index: {0}")]
    UnknownStop(StopId),
    #[error("unknown time zone: {0}")]
    UnresolvableTimeZone(String),
    #[error("journey labels are inconsistent")]
    InvalidJourney,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
