//! Spatial index over stops on Earth-centred Cartesian coordinates.

use rstar::primitives::GeomWithData;
use rstar::RTree;

use super::finder::{NearbyStopsFinder, NearbyStopsFinderFactory, StopWithDistance};
use crate::model::Stop;
use crate::StopId;

const EARTH_RADIUS_KM: f64 = 6371.0;

type IndexedPoint = GeomWithData<[f64; 3], StopId>;

/// Finds nearby stops with a radius search over 3-D Cartesian points.
///
/// Geographic coordinates are projected onto a sphere of Earth's radius, so
/// the reported distance is the straight chord between the points rather
/// than the great-circle arc. The two agree closely for the small radii
/// transfers use; this index is not meant for long distances.
pub struct SpatialStopIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialStopIndex {
    /// Indexes the positions of the given stops. Coordinates are copied, so
    /// the index does not borrow the arena.
    pub fn new(stops: &[Stop]) -> Self {
        let points = stops
            .iter()
            .enumerate()
            .map(|(idx, stop)| IndexedPoint::new(to_cartesian(stop.latitude(), stop.longitude()), idx))
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Factory for injecting this index as the default finder.
    pub fn factory() -> NearbyStopsFinderFactory {
        Box::new(|stops| Box::new(SpatialStopIndex::new(stops)))
    }
}

impl NearbyStopsFinder for SpatialStopIndex {
    fn stops_in_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Vec<StopWithDistance> {
        let query = to_cartesian(latitude, longitude);
        self.tree
            .locate_within_distance(query, radius_km * radius_km)
            .map(|point| StopWithDistance {
                stop: point.data,
                distance_km: chord_distance(&query, point.geom()),
            })
            .collect()
    }
}

fn to_cartesian(latitude: f64, longitude: f64) -> [f64; 3] {
    let phi = latitude.to_radians();
    let lambda = longitude.to_radians();
    [
        EARTH_RADIUS_KM * phi.cos() * lambda.cos(),
        EARTH_RADIUS_KM * phi.cos() * lambda.sin(),
        EARTH_RADIUS_KM * phi.sin(),
    ]
}

fn chord_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}
