//! Job status transitions and the lifecycle operations built on them.
//!
//! ```text
//!   Pending    -> Scheduled | InProgress | Cancelled
//!   Scheduled  -> InProgress | Pending   | Cancelled
//!   InProgress -> Completed  | OnHold    | Cancelled
//!   OnHold     -> InProgress | Cancelled
//! ```
//!
//! `Completed` and `Cancelled` are terminal. Every operation here mutates only
//! the job it is handed; persisting the result is the caller's job.

use chrono::{DateTime, Utc};

use crate::error::{PlannerError, Result};
use crate::job::{GeoStamp, Job, JobStatus};

const DELETED_NOTE: &str = "Job deleted";

/// Whether `to` is a legal edge out of `from`.
pub fn can_transition(from: JobStatus, to: JobStatus) -> bool {
    use JobStatus::*;

    matches!(
        (from, to),
        (Pending, Scheduled | InProgress | Cancelled)
            | (Scheduled, InProgress | Pending | Cancelled)
            | (InProgress, Completed | OnHold | Cancelled)
            | (OnHold, InProgress | Cancelled)
    )
}

pub fn validate_transition(from: JobStatus, to: JobStatus) -> Result<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(PlannerError::InvalidTransition { from, to })
    }
}

/// Statuses reachable in one step from `from`.
pub fn allowed_transitions(from: JobStatus) -> Vec<JobStatus> {
    JobStatus::ALL
        .into_iter()
        .filter(|to| can_transition(from, *to))
        .collect()
}

/// Begin work. Only `Pending` and `Scheduled` jobs can be started.
pub fn start(job: &mut Job, at: DateTime<Utc>, check_in: Option<GeoStamp>) -> Result<()> {
    if !matches!(job.status, JobStatus::Pending | JobStatus::Scheduled) {
        return Err(PlannerError::InvalidState {
            operation: "start",
            status: job.status,
        });
    }
    validate_transition(job.status, JobStatus::InProgress)?;

    job.status = JobStatus::InProgress;
    job.actual_start = Some(at);
    if check_in.is_some() {
        job.check_in = check_in;
    }
    Ok(())
}

/// Finish work. Photos are appended to any already on the job.
pub fn complete(
    job: &mut Job,
    at: DateTime<Utc>,
    check_out: Option<GeoStamp>,
    photos: Vec<String>,
) -> Result<()> {
    if job.status != JobStatus::InProgress {
        return Err(PlannerError::InvalidState {
            operation: "complete",
            status: job.status,
        });
    }
    validate_transition(job.status, JobStatus::Completed)?;

    // End never precedes start.
    let end = match job.actual_start {
        Some(started) if at < started => started,
        _ => at,
    };
    if job.actual_start.is_none() {
        job.actual_start = Some(end);
    }

    job.status = JobStatus::Completed;
    job.actual_end = Some(end);
    if check_out.is_some() {
        job.check_out = check_out;
    }
    job.completion_photos.extend(photos);
    Ok(())
}

pub fn cancel(job: &mut Job, reason: Option<&str>) -> Result<()> {
    if job.status.is_terminal() {
        return Err(PlannerError::AlreadyTerminal { status: job.status });
    }
    validate_transition(job.status, JobStatus::Cancelled)?;

    job.status = JobStatus::Cancelled;
    if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
        job.append_note(&format!("Cancellation reason: {reason}"));
    }
    Ok(())
}

/// Soft delete: cancels a pending job and marks it deleted in the notes.
pub fn soft_delete(job: &mut Job) -> Result<()> {
    if job.status != JobStatus::Pending {
        return Err(PlannerError::NotDeletable { status: job.status });
    }
    validate_transition(job.status, JobStatus::Cancelled)?;

    job.status = JobStatus::Cancelled;
    job.append_note(DELETED_NOTE);
    Ok(())
}

/// Put a job on the calendar. A scheduled job may be moved to a new date.
pub fn schedule(job: &mut Job, start_at: DateTime<Utc>) -> Result<()> {
    match job.status {
        JobStatus::Scheduled => {}
        status => validate_transition(status, JobStatus::Scheduled)?,
    }
    job.status = JobStatus::Scheduled;
    job.scheduled_date = Some(start_at);
    Ok(())
}

pub fn unschedule(job: &mut Job) -> Result<()> {
    if job.status != JobStatus::Scheduled {
        return Err(PlannerError::InvalidState {
            operation: "unschedule",
            status: job.status,
        });
    }
    validate_transition(job.status, JobStatus::Pending)?;

    job.status = JobStatus::Pending;
    job.scheduled_date = None;
    Ok(())
}

/// Pause work in progress.
pub fn hold(job: &mut Job, reason: Option<&str>) -> Result<()> {
    if job.status != JobStatus::InProgress {
        return Err(PlannerError::InvalidState {
            operation: "hold",
            status: job.status,
        });
    }
    validate_transition(job.status, JobStatus::OnHold)?;

    job.status = JobStatus::OnHold;
    if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
        job.append_note(&format!("On hold: {reason}"));
    }
    Ok(())
}

pub fn resume(job: &mut Job) -> Result<()> {
    if job.status != JobStatus::OnHold {
        return Err(PlannerError::InvalidState {
            operation: "resume",
            status: job.status,
        });
    }
    validate_transition(job.status, JobStatus::InProgress)?;

    job.status = JobStatus::InProgress;
    Ok(())
}
