use crate::model::Stop;
use crate::StopId;

/// A stop found near a query point, with the distance to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopWithDistance {
    pub stop: StopId,
    pub distance_km: f64,
}

/// Finds stops within a radius of a geographic point.
///
/// Implementations are injected into the [`TransferManager`] through a
/// [`NearbyStopsFinderFactory`], so tests and callers with their own spatial
/// index can substitute the default implementation.
///
/// [`TransferManager`]: crate::transfers::TransferManager
pub trait NearbyStopsFinder: Send + Sync {
    /// All stops within `radius_km` of the coordinates. A stop lying exactly
    /// on the query point may be part of the result.
    fn stops_in_radius(&self, latitude: f64, longitude: f64, radius_km: f64)
        -> Vec<StopWithDistance>;

    /// All stops within `radius_km` of the given stop, never including the
    /// stop itself.
    fn stops_near_stop(
        &self,
        stop: StopId,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Vec<StopWithDistance> {
        let mut nearby = self.stops_in_radius(latitude, longitude, radius_km);
        nearby.retain(|candidate| candidate.stop != stop);
        nearby
    }
}

/// Builds a finder over the given stop arena. The finder must not keep the
/// borrow: it copies whatever it needs out of the slice.
pub type NearbyStopsFinderFactory = Box<dyn Fn(&[Stop]) -> Box<dyn NearbyStopsFinder>>;
