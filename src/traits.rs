//! Collaborator ports consumed by the planner.
//!
//! Storage, notifications and audit live outside this crate. Host
//! applications implement these traits over their own persistence layer.

use uuid::Uuid;

use crate::error::RepositoryError;
use crate::job::{Job, JobStatus, Resource};
use crate::recurrence::RecurringJobSeries;

/// Job persistence.
pub trait JobRepository {
    fn get_job(&self, id: Uuid) -> Result<Option<Job>, RepositoryError>;

    /// Jobs bound to `resource` whose status is one of `statuses`.
    fn jobs_for_resource(
        &self,
        resource: &Resource,
        statuses: &[JobStatus],
    ) -> Result<Vec<Job>, RepositoryError>;

    fn insert_job(&self, job: &Job) -> Result<(), RepositoryError>;

    fn update_job(&self, job: &Job) -> Result<(), RepositoryError>;

    fn insert_series(&self, series: &RecurringJobSeries) -> Result<(), RepositoryError>;
}

/// Notified after a lifecycle change has been persisted.
pub trait LifecycleListener {
    fn status_changed(&self, job: &Job, previous: JobStatus);

    fn assigned(&self, _job: &Job) {}

    /// A scheduled job moved to a new date without changing status.
    fn rescheduled(&self, _job: &Job) {}
}
