//! Stop sequencing with a greedy nearest-neighbour heuristic.
//!
//! From the origin, always drive to the closest unvisited stop. The result is
//! not globally optimal; it is fast, deterministic for a fixed input order, and
//! reproduces the route ordering users already see.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RouteOptions;
use crate::error::{PlannerError, Result};
use crate::haversine::{distance_miles, drive_minutes};
use crate::job::{Job, Location};
use crate::window::add_minutes;

/// A location to visit. Stops without coordinates cannot be routed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoStop {
    pub id: Uuid,
    pub address: String,
    pub location: Option<Location>,
}

impl GeoStop {
    pub fn new(id: Uuid, address: impl Into<String>, location: Option<Location>) -> Self {
        Self {
            id,
            address: address.into(),
            location,
        }
    }

    pub fn from_job(job: &Job) -> Self {
        Self {
            id: job.id,
            address: job.address.clone().unwrap_or_default(),
            location: job.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub id: Uuid,
    pub address: String,
    pub location: Location,
    /// 1-based position in the route.
    pub sequence: usize,
    pub estimated_arrival: DateTime<Utc>,
    pub service_minutes: i64,
    /// Miles from the previous stop (or the origin).
    pub distance_from_previous: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub stops: Vec<RouteStop>,
    /// Miles.
    pub total_distance: f64,
    /// Drive plus service time, minutes.
    pub total_duration_minutes: f64,
    /// Miles for visiting stops in the order given.
    pub original_distance: f64,
    pub savings_percent: f64,
    /// Stops dropped for lacking coordinates.
    pub skipped: Vec<Uuid>,
}

/// Order `stops` starting from `origin`, departing at `departure`.
///
/// Fewer than two routable stops yields an empty route with zero totals.
/// Fails with [`PlannerError::DateOutOfRange`] if an arrival time cannot be
/// represented.
pub fn optimize_route(
    stops: &[GeoStop],
    origin: Location,
    departure: DateTime<Utc>,
    options: &RouteOptions,
) -> Result<RouteResult> {
    let mut routable: Vec<(&GeoStop, Location)> = Vec::with_capacity(stops.len());
    let mut skipped = Vec::new();
    for stop in stops {
        match stop.location {
            Some(location) => routable.push((stop, location)),
            None => skipped.push(stop.id),
        }
    }

    if routable.len() < 2 {
        return Ok(RouteResult {
            skipped,
            ..RouteResult::default()
        });
    }

    let mut visited = vec![false; routable.len()];
    let mut current = origin;
    let mut clock = departure;
    let mut total_distance = 0.0;
    let mut route = Vec::with_capacity(routable.len());

    while route.len() < routable.len() {
        let Some((next, distance)) = nearest_unvisited(current, &routable, &visited) else {
            break;
        };
        let (stop, location) = routable[next];
        visited[next] = true;

        let arrival = after_minutes(clock, drive_minutes(distance, options.average_speed_mph))?;
        route.push(RouteStop {
            id: stop.id,
            address: stop.address.clone(),
            location,
            sequence: route.len() + 1,
            estimated_arrival: arrival,
            service_minutes: options.service_minutes,
            distance_from_previous: distance,
        });

        clock = add_minutes(arrival, options.service_minutes).ok_or(PlannerError::DateOutOfRange)?;
        current = location;
        total_distance += distance;
    }

    let original_distance = path_distance(origin, routable.iter().map(|(_, location)| *location));
    let savings_percent = if original_distance > 0.0 {
        (original_distance - total_distance) / original_distance * 100.0
    } else {
        0.0
    };
    let total_duration_minutes = drive_minutes(total_distance, options.average_speed_mph)
        + (options.service_minutes * route.len() as i64) as f64;

    tracing::debug!(
        stops = route.len(),
        skipped = skipped.len(),
        total_distance,
        savings_percent,
        "route optimized"
    );

    Ok(RouteResult {
        stops: route,
        total_distance,
        total_duration_minutes,
        original_distance,
        savings_percent,
        skipped,
    })
}

/// Index and distance of the closest unvisited stop. Ties go to the earliest
/// stop in input order.
fn nearest_unvisited(
    from: Location,
    stops: &[(&GeoStop, Location)],
    visited: &[bool],
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, (_, location)) in stops.iter().enumerate() {
        if visited[index] {
            continue;
        }
        let distance = distance_miles(from, *location);
        if !distance.is_finite() {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best
}

/// Miles travelled visiting `locations` in order, starting at `origin`.
fn path_distance(origin: Location, locations: impl Iterator<Item = Location>) -> f64 {
    let mut current = origin;
    let mut total = 0.0;
    for location in locations {
        total += distance_miles(current, location);
        current = location;
    }
    total
}

/// `at` plus fractional `minutes`, rounded to the second.
fn after_minutes(at: DateTime<Utc>, minutes: f64) -> Result<DateTime<Utc>> {
    Duration::try_seconds((minutes * 60.0).round() as i64)
        .and_then(|offset| at.checked_add_signed(offset))
        .ok_or(PlannerError::DateOutOfRange)
}
