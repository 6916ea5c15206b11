//! Route sequencing tests.

mod fixtures;

use chrono::Duration;
use fixtures::at;
use fixtures::service_area::{CUSTOMERS, DEPOT};
use job_planner::config::RouteOptions;
use job_planner::haversine::distance_miles;
use job_planner::route::{optimize_route, GeoStop};
use job_planner::{Location, PlannerError};
use uuid::Uuid;

fn stop(lat: f64, lng: f64) -> GeoStop {
    GeoStop::new(Uuid::new_v4(), format!("{lat},{lng}"), Some(Location::new(lat, lng)))
}

#[test]
fn test_straight_line_is_already_optimal() {
    let a = stop(0.0, 0.0);
    let b = stop(0.0, 1.0);
    let c = stop(0.0, 2.0);
    let stops = vec![a.clone(), b.clone(), c.clone()];

    let result = optimize_route(&stops, Location::new(0.0, 0.0), at(2024, 1, 1, 8, 0), &RouteOptions::default()).unwrap();

    let order: Vec<Uuid> = result.stops.iter().map(|s| s.id).collect();
    assert_eq!(order, vec![a.id, b.id, c.id]);
    assert_eq!(result.savings_percent, 0.0);

    let hop = distance_miles(Location::new(0.0, 0.0), Location::new(0.0, 1.0));
    assert!((result.total_distance - 2.0 * hop).abs() < 1e-6);
    assert_eq!(result.stops[0].distance_from_previous, 0.0);
    assert_eq!(result.stops.iter().map(|s| s.sequence).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn test_reorders_to_nearest_neighbour_and_reports_savings() {
    let far = stop(0.0, 3.0);
    let near = stop(0.0, 1.0);
    let mid = stop(0.0, 2.0);

    let result = optimize_route(
        &[far.clone(), near.clone(), mid.clone()],
        Location::new(0.0, 0.0),
        at(2024, 1, 1, 8, 0),
        &RouteOptions::default(),
    )
    .unwrap();

    let order: Vec<Uuid> = result.stops.iter().map(|s| s.id).collect();
    assert_eq!(order, vec![near.id, mid.id, far.id]);
    // Input order: 0 -> 3 -> 1 -> 2 = 6 degrees, optimized 0 -> 1 -> 2 -> 3 = 3 degrees.
    assert!((result.savings_percent - 50.0).abs() < 1e-6);
    assert!(result.original_distance > result.total_distance);
}

#[test]
fn test_arrival_times_and_duration() {
    let stops = vec![stop(0.0, 0.0), stop(0.0, 1.0)];
    let departure = at(2024, 1, 1, 8, 0);
    let options = RouteOptions::default();

    let result = optimize_route(&stops, Location::new(0.0, 0.0), departure, &options).unwrap();

    let hop = distance_miles(Location::new(0.0, 0.0), Location::new(0.0, 1.0));
    let drive_secs = (hop / 30.0 * 60.0 * 60.0).round() as i64;

    assert_eq!(result.stops[0].estimated_arrival, departure);
    assert_eq!(
        result.stops[1].estimated_arrival,
        departure + Duration::minutes(30) + Duration::seconds(drive_secs)
    );
    let expected_minutes = hop / 30.0 * 60.0 + 60.0;
    assert!((result.total_duration_minutes - expected_minutes).abs() < 1e-6);
    assert!(result.stops.iter().all(|s| s.service_minutes == 30));
}

#[test]
fn test_degenerate_inputs_return_empty_route() {
    let origin = Location::new(36.0, -115.0);
    let departure = at(2024, 1, 1, 8, 0);
    let options = RouteOptions::default();

    let empty = optimize_route(&[], origin, departure, &options).unwrap();
    assert!(empty.stops.is_empty());
    assert_eq!(empty.total_distance, 0.0);
    assert_eq!(empty.total_duration_minutes, 0.0);
    assert_eq!(empty.savings_percent, 0.0);

    let single = optimize_route(&[stop(36.1, -115.1)], origin, departure, &options).unwrap();
    assert!(single.stops.is_empty());
    assert_eq!(single.savings_percent, 0.0);

    let unlocated = GeoStop::new(Uuid::new_v4(), "no geocode", None);
    let one_routable = optimize_route(&[unlocated.clone(), stop(36.1, -115.1)], origin, departure, &options).unwrap();
    assert!(one_routable.stops.is_empty());
    assert_eq!(one_routable.skipped, vec![unlocated.id]);
}

#[test]
fn test_stops_without_coordinates_are_skipped() {
    let unlocated = GeoStop::new(Uuid::new_v4(), "no geocode", None);
    let stops = vec![stop(0.0, 1.0), unlocated.clone(), stop(0.0, 2.0)];

    let result = optimize_route(&stops, Location::new(0.0, 0.0), at(2024, 1, 1, 8, 0), &RouteOptions::default()).unwrap();

    assert_eq!(result.stops.len(), 2);
    assert_eq!(result.skipped, vec![unlocated.id]);
    assert!(result.stops.iter().all(|s| s.id != unlocated.id));
}

#[test]
fn test_equidistant_stops_keep_input_order() {
    let east = stop(0.0, 1.0);
    let west = stop(0.0, -1.0);

    let result = optimize_route(
        &[east.clone(), west.clone()],
        Location::new(0.0, 0.0),
        at(2024, 1, 1, 8, 0),
        &RouteOptions::default(),
    )
    .unwrap();
    assert_eq!(result.stops[0].id, east.id);

    let flipped = optimize_route(
        &[west.clone(), east.clone()],
        Location::new(0.0, 0.0),
        at(2024, 1, 1, 8, 0),
        &RouteOptions::default(),
    )
    .unwrap();
    assert_eq!(flipped.stops[0].id, west.id);
}

#[test]
fn test_repeated_runs_are_identical() {
    let stops: Vec<GeoStop> = CUSTOMERS
        .iter()
        .map(|place| GeoStop::new(Uuid::new_v4(), place.name, Some(place.location)))
        .collect();
    let departure = at(2024, 6, 3, 7, 30);

    let first = optimize_route(&stops, DEPOT.location, departure, &RouteOptions::default()).unwrap();
    for _ in 0..5 {
        let again = optimize_route(&stops, DEPOT.location, departure, &RouteOptions::default()).unwrap();
        assert_eq!(again, first);
    }

    assert_eq!(first.stops.len(), CUSTOMERS.len());
    assert!(first.savings_percent >= 0.0);
    // Henderson depot: the closest customer is Green Valley Ranch.
    assert_eq!(first.stops[0].address, "Green Valley Ranch");
}

#[test]
fn test_unrepresentable_arrival_is_rejected() {
    let options = RouteOptions {
        service_minutes: i64::MAX / 100,
        ..RouteOptions::default()
    };

    let err = optimize_route(
        &[stop(0.0, 1.0), stop(0.0, 2.0)],
        Location::new(0.0, 0.0),
        at(2024, 1, 1, 8, 0),
        &options,
    )
    .unwrap_err();
    assert_eq!(err, PlannerError::DateOutOfRange);
}
