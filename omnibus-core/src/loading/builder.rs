//! Assembly of a query-optimised [`Schedule`] from raw GTFS tables.

use chrono::NaiveDate;
use chrono_tz::Tz;
use hashbrown::HashMap;
use log::{info, warn};

use super::calendar::expand_services;
use super::feed::{FeedRoute, FeedStop, FeedStopTime, FeedTrip, GtfsFeed, LocationType};
use crate::model::time::local_time_on_service_day;
use crate::model::{
    Agency, BaseStop, Route, Schedule, Service, Station, Stop, StopManager, StopTime, Trip,
};
use crate::{AgencyId, Error, StopId};

/// Two trips share a route iff they visit the same stops in the same order
/// and carry the same GTFS route id. Using the full key as the map key means
/// hash collisions degrade into equality checks instead of wrong grouping.
#[derive(Hash, PartialEq, Eq)]
struct RouteKey {
    stops: Vec<StopId>,
    route_id: String,
}

/// Builds a [`Schedule`] from the feed tables, instantiating one concrete
/// trip per service date, optionally bounded by the inclusive
/// `[from_date, to_date]` window.
pub fn build_schedule(
    feed: GtfsFeed,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
) -> Result<Schedule, Error> {
    if let (Some(from), Some(to)) = (from_date, to_date) {
        if to < from {
            return Err(Error::InvalidParameter("date window is reversed"));
        }
    }

    let agencies = build_agencies(&feed.agencies)?;
    let agency_index: HashMap<&str, AgencyId> = agencies
        .iter()
        .enumerate()
        .map(|(idx, agency)| (agency.gtfs_id(), idx))
        .collect();

    let stops = build_stop_manager(feed.stops)?;
    info!(
        "built {} stops and {} stations",
        stops.len(),
        stops.stations().len()
    );

    let services = expand_services(&feed.calendar, &feed.calendar_dates, from_date, to_date)?;

    let mut stop_times_by_trip: HashMap<String, Vec<FeedStopTime>> = HashMap::new();
    for stop_time in feed.stop_times {
        stop_times_by_trip
            .entry(stop_time.trip_id.clone())
            .or_default()
            .push(stop_time);
    }
    for times in stop_times_by_trip.values_mut() {
        times.sort_by_key(|stop_time| stop_time.stop_sequence);
    }

    let route_index: HashMap<&str, &FeedRoute> = feed
        .routes
        .iter()
        .map(|route| (route.route_id.as_str(), route))
        .collect();

    let (trips, trip_to_route) = instantiate_trips(
        &feed.trips,
        &services,
        &stop_times_by_trip,
        &route_index,
        &agencies,
        &agency_index,
        &stops,
    )?;
    info!("instantiated {} trips", trips.len());

    let routes = group_trips_into_routes(trips, &trip_to_route, &route_index, &agencies, &agency_index)?;
    info!("grouped trips into {} routes", routes.len());
    drop(agency_index);

    Ok(Schedule::new(agencies, stops, routes))
}

fn build_agencies(feed_agencies: &[super::feed::FeedAgency]) -> Result<Vec<Agency>, Error> {
    feed_agencies
        .iter()
        .map(|agency| {
            let time_zone: Tz = agency
                .agency_timezone
                .parse()
                .map_err(|_| Error::UnresolvableTimeZone(agency.agency_timezone.clone()))?;
            Ok(Agency::new(
                agency.agency_id.clone(),
                agency.agency_name.clone(),
                agency.agency_url.clone(),
                time_zone,
            ))
        })
        .collect()
}

/// Partitions `stops.txt` rows by location type and assembles the stop
/// manager: platforms become stops carrying their boarding areas, stations
/// carry their entrances, and the parent-station links are wired up.
fn build_stop_manager(feed_stops: Vec<FeedStop>) -> Result<StopManager, Error> {
    let mut platforms = Vec::new();
    let mut station_rows = Vec::new();
    let mut entrance_rows = Vec::new();
    let mut boarding_rows = Vec::new();

    for stop in feed_stops {
        match stop.location_type {
            LocationType::Platform => platforms.push(stop),
            LocationType::Station => station_rows.push(stop),
            LocationType::Entrance => entrance_rows.push(stop),
            LocationType::BoardingArea => boarding_rows.push(stop),
            LocationType::Node => {}
        }
    }

    let mut boarding_by_parent: HashMap<String, Vec<BaseStop>> = HashMap::new();
    for row in boarding_rows {
        if row.parent_station.is_empty() {
            warn!("boarding area '{}' has no parent stop; skipping", row.stop_id);
            continue;
        }
        boarding_by_parent
            .entry(row.parent_station.clone())
            .or_default()
            .push(BaseStop::new(
                row.stop_name,
                row.stop_id,
                row.stop_lat,
                row.stop_lon,
            ));
    }

    let mut entrances_by_parent: HashMap<String, Vec<BaseStop>> = HashMap::new();
    for row in entrance_rows {
        if row.parent_station.is_empty() {
            warn!("entrance '{}' has no parent station; skipping", row.stop_id);
            continue;
        }
        entrances_by_parent
            .entry(row.parent_station.clone())
            .or_default()
            .push(BaseStop::new(
                row.stop_name,
                row.stop_id,
                row.stop_lat,
                row.stop_lon,
            ));
    }

    let mut stops_per_station: HashMap<String, Vec<String>> = HashMap::new();
    let stops: Vec<Stop> = platforms
        .into_iter()
        .map(|platform| {
            if !platform.parent_station.is_empty() {
                stops_per_station
                    .entry(platform.parent_station.clone())
                    .or_default()
                    .push(platform.stop_id.clone());
            }
            let boarding_areas = boarding_by_parent
                .remove(&platform.stop_id)
                .unwrap_or_default();
            let platform_code =
                (!platform.platform_code.is_empty()).then(|| platform.platform_code.clone());
            Stop::new(
                platform.stop_name,
                platform.stop_id,
                platform.stop_lat,
                platform.stop_lon,
                platform_code,
                boarding_areas,
            )
        })
        .collect();

    let stations: Vec<Station> = station_rows
        .into_iter()
        .map(|row| {
            let entrances = entrances_by_parent.remove(&row.stop_id).unwrap_or_default();
            Station::new(row.stop_name, row.stop_id, entrances)
        })
        .collect();

    StopManager::new(stops, stations, &stops_per_station)
}

type TripToRoute = HashMap<String, String>;

fn instantiate_trips(
    feed_trips: &[FeedTrip],
    services: &HashMap<String, Service>,
    stop_times_by_trip: &HashMap<String, Vec<FeedStopTime>>,
    route_index: &HashMap<&str, &FeedRoute>,
    agencies: &[Agency],
    agency_index: &HashMap<&str, AgencyId>,
    stops: &StopManager,
) -> Result<(Vec<Trip>, TripToRoute), Error> {
    let mut trips = Vec::new();
    let mut trip_to_route = TripToRoute::new();

    for feed_trip in feed_trips {
        let service = services.get(&feed_trip.service_id).ok_or_else(|| {
            Error::InconsistentFeed(format!(
                "trip '{}' refers to unknown service ID '{}'",
                feed_trip.trip_id, feed_trip.service_id
            ))
        })?;
        let feed_route = route_index.get(feed_trip.route_id.as_str()).ok_or_else(|| {
            Error::InconsistentFeed(format!(
                "trip '{}' refers to unknown route ID '{}'",
                feed_trip.trip_id, feed_trip.route_id
            ))
        })?;
        let agency = resolve_agency(&feed_route.agency_id, agencies, agency_index)?;
        let time_zone = agencies[agency].time_zone();

        let Some(times) = stop_times_by_trip.get(&feed_trip.trip_id) else {
            warn!("trip '{}' has no stop times; skipping", feed_trip.trip_id);
            continue;
        };

        for &service_day in service.active_days() {
            trips.push(instantiate_trip(feed_trip, times, service_day, time_zone, stops)?);
        }
        trip_to_route.insert(feed_trip.trip_id.clone(), feed_trip.route_id.clone());
    }

    Ok((trips, trip_to_route))
}

/// Materialises one dated run of a GTFS trip, converting each stop time to
/// absolute instants in the agency's zone.
fn instantiate_trip(
    feed_trip: &FeedTrip,
    times: &[FeedStopTime],
    service_day: NaiveDate,
    time_zone: Tz,
    stops: &StopManager,
) -> Result<Trip, Error> {
    let mut stop_times = Vec::with_capacity(times.len());
    for feed_stop_time in times {
        let stop = stops.find_stop(&feed_stop_time.stop_id).ok_or_else(|| {
            Error::InconsistentFeed(format!(
                "stop time of trip '{}' refers to unknown stop ID '{}'",
                feed_trip.trip_id, feed_stop_time.stop_id
            ))
        })?;
        let departure =
            local_time_on_service_day(&feed_stop_time.departure_time, service_day, time_zone)?;
        // Arrival usually equals departure textually; reuse the converted
        // instant so the two compare equal without a second resolution.
        let arrival = if feed_stop_time.arrival_time == feed_stop_time.departure_time {
            departure
        } else {
            local_time_on_service_day(&feed_stop_time.arrival_time, service_day, time_zone)?
        };
        stop_times.push(StopTime::new(arrival, departure, stop));
    }
    let shape_id = (!feed_trip.shape_id.is_empty()).then(|| feed_trip.shape_id.clone());
    Trip::new(stop_times, feed_trip.trip_id.clone(), shape_id)
}

fn group_trips_into_routes(
    trips: Vec<Trip>,
    trip_to_route: &TripToRoute,
    route_index: &HashMap<&str, &FeedRoute>,
    agencies: &[Agency],
    agency_index: &HashMap<&str, AgencyId>,
) -> Result<Vec<Route>, Error> {
    let mut groups: HashMap<RouteKey, Vec<Trip>> = HashMap::new();
    for trip in trips {
        let route_id = trip_to_route
            .get(trip.gtfs_id())
            .expect("every instantiated trip was recorded in the trip-to-route map");
        let key = RouteKey {
            stops: trip.stop_times().iter().map(StopTime::stop).collect(),
            route_id: route_id.clone(),
        };
        groups.entry(key).or_default().push(trip);
    }

    let mut routes = Vec::with_capacity(groups.len());
    for (key, group) in groups {
        let feed_route = route_index
            .get(key.route_id.as_str())
            .expect("route IDs were validated during trip instantiation");
        let agency = resolve_agency(&feed_route.agency_id, agencies, agency_index)?;
        routes.push(Route::new(
            group,
            feed_route.route_short_name.clone(),
            feed_route.route_long_name.clone(),
            key.route_id,
            agency,
        ));
    }

    // A stable route order keeps query results reproducible across builds.
    routes.sort_by(|a, b| {
        a.gtfs_id()
            .cmp(b.gtfs_id())
            .then_with(|| a.stop_sequence().cmp(b.stop_sequence()))
    });
    Ok(routes)
}

fn resolve_agency(
    agency_id: &str,
    agencies: &[Agency],
    agency_index: &HashMap<&str, AgencyId>,
) -> Result<AgencyId, Error> {
    if agency_id.is_empty() {
        // Feeds with a single agency may leave the reference blank.
        if agencies.len() == 1 {
            return Ok(0);
        }
        return Err(Error::InconsistentFeed(
            "route without agency ID in a multi-agency feed".into(),
        ));
    }
    agency_index
        .get(agency_id)
        .copied()
        .ok_or_else(|| Error::InconsistentFeed(format!("unknown agency ID '{agency_id}'")))
}
