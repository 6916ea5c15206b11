//! Double-booking detection for users, crews and equipment.
//!
//! Both checks work over jobs already fetched by the caller. Only jobs in an
//! occupying status (`Scheduled`, `InProgress`) with a complete window count as
//! commitments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::job::{Job, Resource};
use crate::window::TimeWindow;

/// Every resource double-booking is reported as `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConflict {
    pub job_id: Uuid,
    pub job_title: String,
    pub resource: Resource,
    /// The part of the proposed window already taken.
    pub overlap: TimeWindow,
    pub severity: ConflictSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAvailability {
    pub resource: Resource,
    pub available: bool,
}

/// Jobs in `existing` that hold `resource` during `window`, excluding `exclude`.
fn commitments_overlapping<'a>(
    resource: &'a Resource,
    window: TimeWindow,
    existing: &'a [Job],
    exclude: Option<Uuid>,
) -> impl Iterator<Item = (&'a Job, TimeWindow)> + 'a {
    existing
        .iter()
        .filter(move |job| Some(job.id) != exclude)
        .filter(move |job| job.status.is_occupying() && job.is_bound_to(resource))
        .filter_map(move |job| {
            let commitment = job.commitment()?;
            let overlap = commitment.intersection(&window)?;
            Some((job, overlap))
        })
}

/// List every commitment of `resource` that overlaps the proposed placement of
/// `job_id`. The job itself is never reported.
pub fn check_scheduling_conflicts(
    job_id: Uuid,
    resource: Resource,
    proposed_start: DateTime<Utc>,
    duration_minutes: i64,
    existing: &[Job],
) -> Vec<SchedulingConflict> {
    if duration_minutes <= 0 {
        return Vec::new();
    }
    let Some(proposed) = TimeWindow::starting_at(proposed_start, duration_minutes) else {
        return Vec::new();
    };

    commitments_overlapping(&resource, proposed, existing, Some(job_id))
        .map(|(job, overlap)| SchedulingConflict {
            job_id: job.id,
            job_title: job.title.clone(),
            resource,
            overlap,
            severity: ConflictSeverity::High,
            message: format!(
                "{} is already booked on {} ({}) from {} to {}",
                resource,
                job.number,
                job.title,
                overlap.start.format("%Y-%m-%d %H:%M"),
                overlap.end.format("%H:%M"),
            ),
        })
        .collect()
}

/// Whether `resource` is free for all of `[start, end)`.
pub fn check_availability(
    resource: Resource,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Job],
) -> bool {
    let window = TimeWindow::new(start, end);
    if window.is_empty() {
        return true;
    }
    commitments_overlapping(&resource, window, existing, None)
        .next()
        .is_none()
}

pub fn check_user_availability(
    user_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Job],
) -> bool {
    check_availability(Resource::User(user_id), start, end, existing)
}

pub fn check_crew_availability(
    crew_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Job],
) -> bool {
    check_availability(Resource::Crew(crew_id), start, end, existing)
}

/// One availability flag per requested equipment id, in request order.
pub fn check_equipment_availability(
    equipment_ids: &[Uuid],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Job],
) -> Vec<ResourceAvailability> {
    equipment_ids
        .iter()
        .map(|id| {
            let resource = Resource::Equipment(*id);
            ResourceAvailability {
                resource,
                available: check_availability(resource, start, end, existing),
            }
        })
        .collect()
}
