//! Half-open time windows and the overlap test shared by conflict and
//! availability checks.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// `[start, start + minutes)`, or `None` when the end is not representable.
    pub fn starting_at(start: DateTime<Utc>, minutes: i64) -> Option<Self> {
        let end = add_minutes(start, minutes)?;
        Some(Self::new(start, end))
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        overlaps(self, other)
    }

    /// The shared part of two overlapping windows.
    pub fn intersection(&self, other: &TimeWindow) -> Option<TimeWindow> {
        if !self.overlaps(other) {
            return None;
        }
        Some(TimeWindow::new(
            self.start.max(other.start),
            self.end.min(other.end),
        ))
    }
}

/// `[s1,e1)` and `[s2,e2)` overlap iff `s1 < e2 && s2 < e1`.
pub fn overlaps(a: &TimeWindow, b: &TimeWindow) -> bool {
    a.start < b.end && b.start < a.end
}

/// `at + minutes`, or `None` on overflow.
pub fn add_minutes(at: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
    at.checked_add_signed(Duration::try_minutes(minutes)?)
}
