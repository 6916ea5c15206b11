//! Recurring job series.
//!
//! A series clones a base job forward in time at a fixed cadence. Instances
//! are persisted one at a time in date order; a failed instance is logged and
//! skipped, earlier instances stay in place.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SeriesOptions;
use crate::error::{PlannerError, Result};
use crate::job::{Job, JobStatus};
use crate::traits::JobRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
}

impl Cadence {
    /// Date of the `n`th occurrence counted from `start` (0 is `start`).
    ///
    /// Calendar-month cadences are computed from `start` rather than from the
    /// previous occurrence, so a series beginning on the 31st returns to the
    /// 31st whenever the month has one.
    pub fn nth_after(self, start: DateTime<Utc>, n: u32) -> Result<DateTime<Utc>> {
        let shifted = match self {
            Cadence::Weekly => Duration::try_days(7 * i64::from(n)).and_then(|offset| start.checked_add_signed(offset)),
            Cadence::Biweekly => Duration::try_days(14 * i64::from(n)).and_then(|offset| start.checked_add_signed(offset)),
            Cadence::Monthly => start.checked_add_months(Months::new(n)),
            Cadence::Quarterly => n
                .checked_mul(3)
                .and_then(|months| start.checked_add_months(Months::new(months))),
        };
        shifted.ok_or(PlannerError::DateOutOfRange)
    }
}

impl FromStr for Cadence {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Cadence::Weekly),
            "biweekly" => Ok(Cadence::Biweekly),
            "monthly" => Ok(Cadence::Monthly),
            "quarterly" => Ok(Cadence::Quarterly),
            _ => Err(PlannerError::InvalidCadence(value.to_string())),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Weekly => write!(f, "weekly"),
            Cadence::Biweekly => write!(f, "biweekly"),
            Cadence::Monthly => write!(f, "monthly"),
            Cadence::Quarterly => write!(f, "quarterly"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringJobSeries {
    pub id: Uuid,
    pub base_job_id: Uuid,
    pub cadence: Cadence,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_occurrences: u32,
    pub jobs_created: u32,
    pub upcoming_job_ids: Vec<Uuid>,
    /// One cadence step past the last created instance.
    pub next_occurrence: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRequest<'a> {
    pub cadence: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_occurrences: Option<u32>,
}

/// Clone `base` into a new pending instance dated `scheduled`.
pub fn instance_of(base: &Job, cadence: Cadence, scheduled: DateTime<Utc>, ordinal: u32) -> Job {
    let mut job = Job::new(base.tenant_id, format!("{}-{}", base.number, ordinal), base.title.clone());
    job.description = base.description.clone();
    job.customer_id = base.customer_id;
    job.property_id = base.property_id;
    job.location = base.location;
    job.address = base.address.clone();
    job.assigned_user_id = base.assigned_user_id;
    job.crew_id = base.crew_id;
    job.crew_size = base.crew_size;
    job.priority = base.priority;
    job.weather_dependent = base.weather_dependent;
    job.required_equipment = base.required_equipment.clone();
    job.estimated_duration_minutes = base.estimated_duration_minutes;

    job.status = JobStatus::Pending;
    job.scheduled_date = Some(scheduled);
    job.parent_job_id = Some(base.id);
    job.recurring_schedule = Some(cadence.to_string());
    job
}

/// Generate and persist the instances of a series.
///
/// The cadence is validated before anything is written. At most
/// `min(options.default_max_occurrences, request.max_occurrences)` instances are
/// attempted, and none dated after `request.end_date`.
pub fn generate_series<R>(
    base: &Job,
    request: &SeriesRequest<'_>,
    repository: &R,
    options: &SeriesOptions,
) -> Result<RecurringJobSeries>
where
    R: JobRepository + ?Sized,
{
    let cadence: Cadence = request.cadence.parse()?;
    let cap = request
        .max_occurrences
        .map_or(options.default_max_occurrences, |max| max.min(options.default_max_occurrences));

    let mut series = RecurringJobSeries {
        id: Uuid::new_v4(),
        base_job_id: base.id,
        cadence,
        start_date: request.start_date,
        end_date: request.end_date,
        max_occurrences: cap,
        jobs_created: 0,
        upcoming_job_ids: Vec::new(),
        next_occurrence: None,
    };

    let mut last_created: Option<u32> = None;
    for n in 0..cap {
        let date = cadence.nth_after(request.start_date, n)?;
        if request.end_date.is_some_and(|end| date > end) {
            break;
        }

        let instance = instance_of(base, cadence, date, n + 1);
        if let Err(err) = repository.insert_job(&instance) {
            tracing::warn!(
                base_job_id = %base.id,
                occurrence = n + 1,
                error = %err,
                "failed to create recurring job instance, skipping"
            );
            continue;
        }

        series.upcoming_job_ids.push(instance.id);
        series.jobs_created += 1;
        last_created = Some(n);
    }

    series.next_occurrence = match last_created {
        Some(n) => Some(cadence.nth_after(request.start_date, n + 1)?),
        None => None,
    };

    tracing::info!(
        series_id = %series.id,
        base_job_id = %base.id,
        %cadence,
        jobs_created = series.jobs_created,
        "recurring series generated"
    );

    Ok(series)
}
