//! Job-management facade.
//!
//! Loads jobs through a [`JobRepository`], runs the pure components, and
//! writes the result back. Each lifecycle command mutates the job once, after
//! validation has passed; the listener hears about it only once the write
//! succeeded.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::availability::{check_availability, check_scheduling_conflicts, SchedulingConflict};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::job::{GeoStamp, Job, JobStatus, Location, Resource};
use crate::recurrence::{generate_series, RecurringJobSeries, SeriesRequest};
use crate::route::{optimize_route, GeoStop, RouteResult};
use crate::state_machine;
use crate::suggest::{suggest_slots, SchedulingSuggestion, SlotConstraints};
use crate::traits::{JobRepository, LifecycleListener};
use crate::window::TimeWindow;

pub struct JobPlanner<R> {
    repository: R,
    config: PlannerConfig,
    listener: Option<Box<dyn LifecycleListener + Send + Sync>>,
}

impl<R: JobRepository> JobPlanner<R> {
    pub fn new(repository: R, config: PlannerConfig) -> Self {
        Self {
            repository,
            config,
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: impl LifecycleListener + Send + Sync + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Persist a new job in `Pending`. A job with a schedule window is refused
    /// if its crew or any required equipment is already booked.
    pub fn create_job(&self, mut job: Job) -> Result<Job> {
        job.status = JobStatus::Pending;
        if let Some(window) = job.commitment() {
            self.ensure_resources_free(&job, window)?;
        }
        self.repository.insert_job(&job)?;
        tracing::info!(job_id = %job.id, number = %job.number, "job created");
        Ok(job)
    }

    pub fn start_job(&self, job_id: Uuid, at: DateTime<Utc>, check_in: Option<GeoStamp>) -> Result<Job> {
        self.apply(job_id, |job| state_machine::start(job, at, check_in))
    }

    pub fn complete_job(
        &self,
        job_id: Uuid,
        at: DateTime<Utc>,
        check_out: Option<GeoStamp>,
        photos: Vec<String>,
    ) -> Result<Job> {
        self.apply(job_id, |job| state_machine::complete(job, at, check_out, photos))
    }

    pub fn cancel_job(&self, job_id: Uuid, reason: Option<&str>) -> Result<Job> {
        self.apply(job_id, |job| state_machine::cancel(job, reason))
    }

    pub fn delete_job(&self, job_id: Uuid) -> Result<Job> {
        self.apply(job_id, state_machine::soft_delete)
    }

    pub fn hold_job(&self, job_id: Uuid, reason: Option<&str>) -> Result<Job> {
        self.apply(job_id, |job| state_machine::hold(job, reason))
    }

    pub fn resume_job(&self, job_id: Uuid) -> Result<Job> {
        self.apply(job_id, state_machine::resume)
    }

    pub fn unschedule_job(&self, job_id: Uuid) -> Result<Job> {
        self.apply(job_id, state_machine::unschedule)
    }

    /// Schedule (or reschedule) a job at `start_at`.
    ///
    /// Busy crew or equipment fails the call. Conflicts for the assigned user
    /// are advisory and returned alongside the updated job.
    pub fn schedule_job(&self, job_id: Uuid, start_at: DateTime<Utc>) -> Result<(Job, Vec<SchedulingConflict>)> {
        let mut job = self.load(job_id)?;
        let previous = job.status;

        let mut conflicts = Vec::new();
        if let Some(minutes) = job.estimated_duration_minutes.filter(|m| *m > 0) {
            let window = TimeWindow::starting_at(start_at, minutes).ok_or(PlannerError::DateOutOfRange)?;
            self.ensure_resources_free(&job, window)?;
            if let Some(user) = job.assigned_user_id {
                conflicts = self.check_conflicts(job.id, Resource::User(user), start_at, minutes)?;
            }
        }

        state_machine::schedule(&mut job, start_at)?;
        if previous == JobStatus::Scheduled {
            self.repository.update_job(&job)?;
            tracing::info!(job_id = %job.id, scheduled_date = %start_at, "job rescheduled");
            if let Some(listener) = &self.listener {
                listener.rescheduled(&job);
            }
        } else {
            self.commit(&job, previous)?;
        }
        Ok((job, conflicts))
    }

    /// Assign `user_id` to a job. The assignment always goes through; any
    /// double-booking of the new assignee is returned for the caller to show.
    pub fn assign_job(&self, job_id: Uuid, user_id: Uuid) -> Result<(Job, Vec<SchedulingConflict>)> {
        let mut job = self.load(job_id)?;
        if job.status.is_terminal() {
            return Err(PlannerError::InvalidState {
                operation: "assign",
                status: job.status,
            });
        }

        let conflicts = match (job.scheduled_date, job.estimated_duration_minutes) {
            (Some(start), Some(minutes)) => {
                self.check_conflicts(job.id, Resource::User(user_id), start, minutes)?
            }
            _ => Vec::new(),
        };

        job.assigned_user_id = Some(user_id);
        self.repository.update_job(&job)?;
        tracing::info!(job_id = %job.id, user_id = %user_id, conflicts = conflicts.len(), "job assigned");
        if let Some(listener) = &self.listener {
            listener.assigned(&job);
        }
        Ok((job, conflicts))
    }

    /// Conflicts for placing `job_id` on `resource` at `proposed_start`.
    pub fn check_conflicts(
        &self,
        job_id: Uuid,
        resource: Resource,
        proposed_start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<Vec<SchedulingConflict>> {
        let existing = self.repository.jobs_for_resource(&resource, &JobStatus::OCCUPYING)?;
        Ok(check_scheduling_conflicts(
            job_id,
            resource,
            proposed_start,
            duration_minutes,
            &existing,
        ))
    }

    pub fn is_available(&self, resource: Resource, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<bool> {
        let existing = self.repository.jobs_for_resource(&resource, &JobStatus::OCCUPYING)?;
        Ok(check_availability(resource, start, end, &existing))
    }

    pub fn suggest_slots(
        &self,
        job_id: Uuid,
        preferred: Option<DateTime<Utc>>,
        constraints: &SlotConstraints,
        now: DateTime<Utc>,
    ) -> Result<SchedulingSuggestion> {
        let job = self.load(job_id)?;
        let existing = match job.assigned_user_id {
            Some(user) => self
                .repository
                .jobs_for_resource(&Resource::User(user), &JobStatus::OCCUPYING)?,
            None => Vec::new(),
        };
        suggest_slots(&job, preferred, constraints, &existing, now, &self.config.suggest)
    }

    /// Sequence the given jobs from `origin`. Jobs whose property has no
    /// geocode are reported in [`RouteResult::skipped`].
    pub fn optimize_route(
        &self,
        job_ids: &[Uuid],
        origin: Location,
        departure: DateTime<Utc>,
    ) -> Result<RouteResult> {
        let stops = job_ids
            .iter()
            .map(|id| self.load(*id).map(|job| GeoStop::from_job(&job)))
            .collect::<Result<Vec<_>>>()?;
        optimize_route(&stops, origin, departure, &self.config.route)
    }

    pub fn create_recurring_series(
        &self,
        base_job_id: Uuid,
        request: &SeriesRequest<'_>,
    ) -> Result<RecurringJobSeries> {
        let base = self.load(base_job_id)?;
        let series = generate_series(&base, request, &self.repository, &self.config.series)?;
        self.repository.insert_series(&series)?;
        Ok(series)
    }

    fn load(&self, job_id: Uuid) -> Result<Job> {
        self.repository
            .get_job(job_id)?
            .ok_or(PlannerError::JobNotFound(job_id))
    }

    fn apply<F>(&self, job_id: Uuid, operation: F) -> Result<Job>
    where
        F: FnOnce(&mut Job) -> Result<()>,
    {
        let mut job = self.load(job_id)?;
        let previous = job.status;
        operation(&mut job)?;
        self.commit(&job, previous)?;
        Ok(job)
    }

    fn commit(&self, job: &Job, previous: JobStatus) -> Result<()> {
        self.repository.update_job(job)?;
        tracing::info!(job_id = %job.id, from = %previous, to = %job.status, "job status changed");
        if let Some(listener) = &self.listener {
            listener.status_changed(job, previous);
        }
        Ok(())
    }

    /// Crew and equipment must be free; the job's own bookings do not count.
    fn ensure_resources_free(&self, job: &Job, window: TimeWindow) -> Result<()> {
        let resources = job
            .crew_id
            .map(Resource::Crew)
            .into_iter()
            .chain(job.required_equipment.iter().copied().map(Resource::Equipment));

        for resource in resources {
            let existing: Vec<Job> = self
                .repository
                .jobs_for_resource(&resource, &JobStatus::OCCUPYING)?
                .into_iter()
                .filter(|other| other.id != job.id)
                .collect();
            if !check_availability(resource, window.start, window.end, &existing) {
                return Err(PlannerError::ResourceUnavailable(resource));
            }
        }
        Ok(())
    }
}
