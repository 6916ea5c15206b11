//! job-planner core
//!
//! Job lifecycle validation, double-booking checks, route sequencing,
//! recurring series and slot suggestion for field-service jobs.

pub mod availability;
pub mod config;
pub mod error;
pub mod haversine;
pub mod job;
pub mod planner;
pub mod recurrence;
pub mod route;
pub mod state_machine;
pub mod suggest;
pub mod traits;
pub mod window;

pub use error::{PlannerError, RepositoryError, Result};
pub use job::{GeoStamp, Job, JobStatus, Location, Resource};
pub use planner::JobPlanner;
