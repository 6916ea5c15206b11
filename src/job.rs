//! Job data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::window::TimeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Scheduled,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub const ALL: [JobStatus; 6] = [
        JobStatus::Pending,
        JobStatus::Scheduled,
        JobStatus::InProgress,
        JobStatus::OnHold,
        JobStatus::Completed,
        JobStatus::Cancelled,
    ];

    /// Statuses in which a job holds its resources for its scheduled window.
    pub const OCCUPYING: [JobStatus; 2] = [JobStatus::Scheduled, JobStatus::InProgress];

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    pub fn is_occupying(self) -> bool {
        Self::OCCUPYING.contains(&self)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Scheduled => write!(f, "scheduled"),
            JobStatus::InProgress => write!(f, "in_progress"),
            JobStatus::OnHold => write!(f, "on_hold"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// Geo check-in / check-out stamp captured on site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoStamp {
    pub location: Location,
    pub address: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Anything that can be double-booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Resource {
    User(Uuid),
    Crew(Uuid),
    Equipment(Uuid),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::User(id) => write!(f, "user {id}"),
            Resource::Crew(id) => write!(f, "crew {id}"),
            Resource::Equipment(id) => write!(f, "equipment {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// A unit of scheduled field work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Human-readable sequence number, e.g. `JOB-0042`.
    pub number: String,
    pub title: String,
    pub description: Option<String>,
    pub customer_id: Option<Uuid>,
    pub status: JobStatus,
    pub priority: Priority,

    pub scheduled_date: Option<DateTime<Utc>>,
    pub estimated_duration_minutes: Option<i64>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,

    pub assigned_user_id: Option<Uuid>,
    pub crew_id: Option<Uuid>,
    pub crew_size: Option<u32>,
    pub required_equipment: Vec<Uuid>,
    pub weather_dependent: bool,

    pub property_id: Option<Uuid>,
    /// Geocode of the property; `None` means the job cannot be routed.
    pub location: Option<Location>,
    pub address: Option<String>,

    pub check_in: Option<GeoStamp>,
    pub check_out: Option<GeoStamp>,
    pub completion_photos: Vec<String>,
    pub notes: String,

    pub parent_job_id: Option<Uuid>,
    pub recurring_schedule: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(tenant_id: Uuid, number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            number: number.into(),
            title: title.into(),
            description: None,
            customer_id: None,
            status: JobStatus::Pending,
            priority: Priority::default(),
            scheduled_date: None,
            estimated_duration_minutes: None,
            actual_start: None,
            actual_end: None,
            assigned_user_id: None,
            crew_id: None,
            crew_size: None,
            required_equipment: Vec::new(),
            weather_dependent: false,
            property_id: None,
            location: None,
            address: None,
            check_in: None,
            check_out: None,
            completion_photos: Vec::new(),
            notes: String::new(),
            parent_job_id: None,
            recurring_schedule: None,
            created_at: Utc::now(),
        }
    }

    /// The window this job occupies, if it has both a date and a positive
    /// duration and the end falls within the calendar.
    pub fn commitment(&self) -> Option<TimeWindow> {
        let start = self.scheduled_date?;
        let minutes = self.estimated_duration_minutes?;
        if minutes <= 0 {
            return None;
        }
        TimeWindow::starting_at(start, minutes)
    }

    /// Whether the job currently holds `resource`.
    pub fn is_bound_to(&self, resource: &Resource) -> bool {
        match resource {
            Resource::User(id) => self.assigned_user_id.as_ref() == Some(id),
            Resource::Crew(id) => self.crew_id.as_ref() == Some(id),
            Resource::Equipment(id) => self.required_equipment.contains(id),
        }
    }

    /// Append a line to the free-text notes, never replacing what is there.
    pub fn append_note(&mut self, line: &str) {
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(line);
    }
}
