//! The round-based routing engine and journey reconstruction.

pub mod journey;
pub mod router;
pub mod state;

pub use journey::{Movement, PtMovement, WalkingMovement};
pub use router::Router;
pub use state::{Label, LabelManager, RaptorState};
