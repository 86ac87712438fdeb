//! Stops, stations and the manager that links them.
//!
//! GTFS `stops.txt` mixes several kinds of points: platforms, stations,
//! station entrances and boarding areas. Platforms become [`Stop`]s, the
//! remaining kinds are carried as [`BaseStop`]s attached to their parent.

use std::hash::{Hash, Hasher};

use hashbrown::HashMap;

use crate::{Error, StationId, StopId};

/// Common attributes of every stop-like point in the feed.
#[derive(Debug, Clone)]
pub struct BaseStop {
    name: String,
    gtfs_id: String,
    latitude: f64,
    longitude: f64,
}

impl BaseStop {
    pub fn new(name: String, gtfs_id: String, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            gtfs_id,
            latitude,
            longitude,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gtfs_id(&self) -> &str {
        &self.gtfs_id
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl PartialEq for BaseStop {
    fn eq(&self, other: &Self) -> bool {
        self.gtfs_id == other.gtfs_id
    }
}

impl Eq for BaseStop {}

pub type StationEntrance = BaseStop;
pub type BoardingArea = BaseStop;

/// A stop (platform) that vehicles call at.
///
/// Equality and hashing use the GTFS id only.
#[derive(Debug)]
pub struct Stop {
    name: String,
    gtfs_id: String,
    latitude: f64,
    longitude: f64,
    platform_code: Option<String>,
    boarding_areas: Vec<BoardingArea>,
    parent_station: Option<StationId>,
}

impl Stop {
    pub fn new(
        name: String,
        gtfs_id: String,
        latitude: f64,
        longitude: f64,
        platform_code: Option<String>,
        boarding_areas: Vec<BoardingArea>,
    ) -> Self {
        Self {
            name,
            gtfs_id,
            latitude,
            longitude,
            platform_code,
            boarding_areas,
            parent_station: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gtfs_id(&self) -> &str {
        &self.gtfs_id
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn platform_code(&self) -> Option<&str> {
        self.platform_code.as_deref()
    }

    pub fn boarding_areas(&self) -> &[BoardingArea] {
        &self.boarding_areas
    }

    pub fn parent_station(&self) -> Option<StationId> {
        self.parent_station
    }
}

impl PartialEq for Stop {
    fn eq(&self, other: &Self) -> bool {
        self.gtfs_id == other.gtfs_id
    }
}

impl Eq for Stop {}

impl Hash for Stop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.gtfs_id.hash(state);
    }
}

/// A station groups co-located stops and entrances. It references its child
/// stops by index and does not own them.
#[derive(Debug)]
pub struct Station {
    name: String,
    gtfs_id: String,
    stops: Vec<StopId>,
    entrances: Vec<StationEntrance>,
}

impl Station {
    pub fn new(name: String, gtfs_id: String, entrances: Vec<StationEntrance>) -> Self {
        Self {
            name,
            gtfs_id,
            stops: Vec::new(),
            entrances,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gtfs_id(&self) -> &str {
        &self.gtfs_id
    }

    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    pub fn entrances(&self) -> &[StationEntrance] {
        &self.entrances
    }
}

/// Owns all stops and stations and establishes the parent/child links
/// between them, in both directions, at construction time.
///
/// The manager is deliberately not `Clone`: the cross-links would have to be
/// rebuilt for the copy.
#[derive(Debug)]
pub struct StopManager {
    stops: Vec<Stop>,
    stations: Vec<Station>,
    stop_index: HashMap<String, StopId>,
    station_index: HashMap<String, StationId>,
}

impl StopManager {
    /// Takes ownership of the given stops and stations and wires up the
    /// parent/child relationship according to `stops_per_station`, a map
    /// from a station's GTFS id to the GTFS ids of its child stops.
    ///
    /// Fails with [`Error::InconsistentFeed`] if the map names a stop or
    /// station that does not exist.
    pub fn new(
        stops: Vec<Stop>,
        stations: Vec<Station>,
        stops_per_station: &HashMap<String, Vec<String>>,
    ) -> Result<Self, Error> {
        let stop_index: HashMap<String, StopId> = stops
            .iter()
            .enumerate()
            .map(|(idx, stop)| (stop.gtfs_id.clone(), idx))
            .collect();
        let station_index: HashMap<String, StationId> = stations
            .iter()
            .enumerate()
            .map(|(idx, station)| (station.gtfs_id.clone(), idx))
            .collect();

        let mut manager = Self {
            stops,
            stations,
            stop_index,
            station_index,
        };

        for (station_id, children) in stops_per_station {
            let station_idx = *manager.station_index.get(station_id).ok_or_else(|| {
                Error::InconsistentFeed(format!("unknown parent station ID '{station_id}'"))
            })?;
            for child_id in children {
                let stop_idx = *manager.stop_index.get(child_id).ok_or_else(|| {
                    Error::InconsistentFeed(format!("unknown child stop ID '{child_id}'"))
                })?;
                manager.stops[stop_idx].parent_station = Some(station_idx);
                manager.stations[station_idx].stops.push(stop_idx);
            }
        }

        Ok(manager)
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id]
    }

    pub fn station(&self, id: StationId) -> &Station {
        &self.stations[id]
    }

    pub fn find_stop(&self, gtfs_id: &str) -> Option<StopId> {
        self.stop_index.get(gtfs_id).copied()
    }

    pub fn find_station(&self, gtfs_id: &str) -> Option<StationId> {
        self.station_index.get(gtfs_id).copied()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(gtfs_id: &str) -> Stop {
        Stop::new("test".into(), gtfs_id.into(), 1.1, 2.2, None, Vec::new())
    }

    #[test]
    fn base_stop_equals_uses_only_gtfs_id() {
        let stop1 = BaseStop::new("test".into(), "123".into(), 1.1, 2.2);
        let stop2 = BaseStop::new("test".into(), "1234".into(), 1.1, 2.2);
        let stop3 = BaseStop::new("hello".into(), "123".into(), 5.0, 6.0);
        assert_eq!(stop1, stop3);
        assert_ne!(stop1, stop2);
    }

    #[test]
    fn stop_equals_uses_only_gtfs_id() {
        let stop1 = stop("123");
        let stop2 = stop("1234");
        let stop3 = Stop::new(
            "hello".into(),
            "123".into(),
            5.0,
            6.0,
            None,
            vec![BoardingArea::new("test".into(), "test".into(), 0.0, 6.5)],
        );
        assert_eq!(stop1, stop3);
        assert_ne!(stop1, stop2);
    }

    #[test]
    fn initialise_without_relationships() {
        let station = Station::new("station".into(), "789".into(), Vec::new());
        let manager = StopManager::new(vec![stop("123")], vec![station], &HashMap::new()).unwrap();
        assert_eq!(manager.stops()[0].parent_station(), None);
        assert!(manager.stations()[0].stops().is_empty());
    }

    #[test]
    fn initialise_with_relationships() {
        let station = Station::new("station".into(), "station1".into(), Vec::new());
        let mut children = HashMap::new();
        children.insert("station1".to_string(), vec!["stop1".to_string()]);
        let manager = StopManager::new(vec![stop("stop1")], vec![station], &children).unwrap();
        assert_eq!(manager.stops()[0].parent_station(), Some(0));
        assert_eq!(manager.stations()[0].stops(), &[0]);
    }

    #[test]
    fn initialise_with_partial_relationships() {
        let stations = vec![
            Station::new("station1".into(), "station1".into(), Vec::new()),
            Station::new("station2".into(), "station2".into(), Vec::new()),
        ];
        let mut children = HashMap::new();
        children.insert("station1".to_string(), vec!["stop1".to_string()]);
        let manager =
            StopManager::new(vec![stop("stop1"), stop("stop2")], stations, &children).unwrap();
        for inserted in manager.stops() {
            if inserted.gtfs_id() == "stop1" {
                assert!(inserted.parent_station().is_some());
            } else {
                assert!(inserted.parent_station().is_none());
            }
        }
        for inserted in manager.stations() {
            if inserted.gtfs_id() == "station1" {
                assert!(!inserted.stops().is_empty());
            } else {
                assert!(inserted.stops().is_empty());
            }
        }
    }

    #[test]
    fn initialise_invalid_stop_id() {
        let station = Station::new("station".into(), "789".into(), Vec::new());
        let mut children = HashMap::new();
        children.insert("789".to_string(), vec!["5612317".to_string()]);
        let result = StopManager::new(vec![stop("123")], vec![station], &children);
        assert!(matches!(result, Err(Error::InconsistentFeed(_))));
    }

    #[test]
    fn initialise_invalid_station_id() {
        let station = Station::new("station".into(), "789".into(), Vec::new());
        let mut children = HashMap::new();
        children.insert("123112".to_string(), vec!["123".to_string()]);
        let result = StopManager::new(vec![stop("123")], vec![station], &children);
        assert!(matches!(result, Err(Error::InconsistentFeed(_))));
    }
}
