//! Test fixtures for job-planner.
//!
//! Provides:
//! - a `TestJob` builder with sensible defaults
//! - an in-memory `JobRepository` with injectable failures
//! - real Las Vegas / Henderson locations for routing

#![allow(dead_code)]

pub mod service_area;

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use job_planner::recurrence::RecurringJobSeries;
use job_planner::traits::{JobRepository, LifecycleListener};
use job_planner::{Job, JobStatus, Location, RepositoryError, Resource};

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// Builder for test jobs.
#[derive(Clone, Debug)]
pub struct TestJob {
    job: Job,
}

impl TestJob {
    pub fn new(title: &str) -> Self {
        let mut job = Job::new(Uuid::nil(), "JOB-0001", title);
        job.created_at = at(2024, 1, 1, 0, 0);
        Self { job }
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.job.status = status;
        self
    }

    pub fn scheduled(mut self, start: DateTime<Utc>, minutes: i64) -> Self {
        self.job.status = JobStatus::Scheduled;
        self.job.scheduled_date = Some(start);
        self.job.estimated_duration_minutes = Some(minutes);
        self
    }

    pub fn duration(mut self, minutes: i64) -> Self {
        self.job.estimated_duration_minutes = Some(minutes);
        self
    }

    pub fn user(mut self, user: Uuid) -> Self {
        self.job.assigned_user_id = Some(user);
        self
    }

    pub fn crew(mut self, crew: Uuid) -> Self {
        self.job.crew_id = Some(crew);
        self
    }

    pub fn equipment(mut self, equipment: Uuid) -> Self {
        self.job.required_equipment.push(equipment);
        self
    }

    pub fn located(mut self, location: Location) -> Self {
        self.job.location = Some(location);
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.job.notes = notes.to_string();
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}

/// In-memory repository. Inserts are counted from 1; ordinals listed in
/// `fail_inserts` fail instead of storing.
#[derive(Default)]
pub struct MemoryRepository {
    pub jobs: Mutex<HashMap<Uuid, Job>>,
    pub insert_order: Mutex<Vec<Uuid>>,
    pub series: Mutex<Vec<RecurringJobSeries>>,
    pub fail_inserts: HashSet<usize>,
    pub fail_fetches: bool,
    inserts: Mutex<usize>,
}

impl MemoryRepository {
    pub fn with(jobs: impl IntoIterator<Item = Job>) -> Self {
        let repository = Self::default();
        {
            let mut stored = repository.jobs.lock().unwrap();
            for job in jobs {
                stored.insert(job.id, job);
            }
        }
        repository
    }

    pub fn failing_inserts(mut self, ordinals: &[usize]) -> Self {
        self.fail_inserts = ordinals.iter().copied().collect();
        self
    }

    pub fn failing_fetches(mut self) -> Self {
        self.fail_fetches = true;
        self
    }

    pub fn job(&self, id: Uuid) -> Job {
        self.jobs.lock().unwrap()[&id].clone()
    }

    pub fn inserted(&self) -> Vec<Job> {
        let jobs = self.jobs.lock().unwrap();
        self.insert_order
            .lock()
            .unwrap()
            .iter()
            .map(|id| jobs[id].clone())
            .collect()
    }
}

impl JobRepository for MemoryRepository {
    fn get_job(&self, id: Uuid) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.lock().unwrap().get(&id).cloned())
    }

    fn jobs_for_resource(
        &self,
        resource: &Resource,
        statuses: &[JobStatus],
    ) -> Result<Vec<Job>, RepositoryError> {
        if self.fail_fetches {
            return Err(RepositoryError::new("connection reset"));
        }
        let mut jobs: Vec<Job> = self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|job| job.is_bound_to(resource) && statuses.contains(&job.status))
            .cloned()
            .collect();
        jobs.sort_by_key(|job| job.scheduled_date);
        Ok(jobs)
    }

    fn insert_job(&self, job: &Job) -> Result<(), RepositoryError> {
        let ordinal = {
            let mut inserts = self.inserts.lock().unwrap();
            *inserts += 1;
            *inserts
        };
        if self.fail_inserts.contains(&ordinal) {
            return Err(RepositoryError::new(format!("insert #{ordinal} rejected")));
        }
        self.jobs.lock().unwrap().insert(job.id, job.clone());
        self.insert_order.lock().unwrap().push(job.id);
        Ok(())
    }

    fn update_job(&self, job: &Job) -> Result<(), RepositoryError> {
        self.jobs.lock().unwrap().insert(job.id, job.clone());
        Ok(())
    }

    fn insert_series(&self, series: &RecurringJobSeries) -> Result<(), RepositoryError> {
        self.series.lock().unwrap().push(series.clone());
        Ok(())
    }
}

/// Records every notification it receives.
#[derive(Default, Clone)]
pub struct RecordingListener {
    pub events: std::sync::Arc<Mutex<Vec<String>>>,
}

impl LifecycleListener for RecordingListener {
    fn status_changed(&self, job: &Job, previous: JobStatus) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{}: {} -> {}", job.title, previous, job.status));
    }

    fn assigned(&self, job: &Job) {
        self.events.lock().unwrap().push(format!("{}: assigned", job.title));
    }

    fn rescheduled(&self, job: &Job) {
        self.events.lock().unwrap().push(format!("{}: rescheduled", job.title));
    }
}
