use thiserror::Error;
use uuid::Uuid;

use crate::job::{JobStatus, Resource};

/// Failure reported by a persistence collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("repository error: {0}")]
pub struct RepositoryError(pub String);

impl RepositoryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("cannot transition from {from} to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    #[error("cannot {operation} job in status {status}")]
    InvalidState {
        operation: &'static str,
        status: JobStatus,
    },

    #[error("job is already {status}")]
    AlreadyTerminal { status: JobStatus },

    #[error("only pending jobs can be deleted (status: {status})")]
    NotDeletable { status: JobStatus },

    #[error("invalid recurrence frequency: {0}")]
    InvalidCadence(String),

    #[error("job not found: {0}")]
    JobNotFound(Uuid),

    #[error("job {0} has no estimated duration")]
    MissingDuration(Uuid),

    #[error("invalid scheduling constraints: {0}")]
    InvalidConstraints(String),

    #[error("{0} is not available for the requested window")]
    ResourceUnavailable(Resource),

    #[error("date arithmetic out of range")]
    DateOutOfRange,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
