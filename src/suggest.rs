//! Open-slot search for a single job.
//!
//! Hourly candidates over a fixed horizon are filtered by the assigned user's
//! existing commitments and ranked with a simple score: closeness to the
//! preferred date plus a bonus for business hours. Ties keep scan order
//! (earlier day, then earlier hour).

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::check_scheduling_conflicts;
use crate::config::SuggestOptions;
use crate::error::{PlannerError, Result};
use crate::job::{Job, Resource};
use crate::window::add_minutes;

const BASE_SCORE: i32 = 100;
const PENALTY_PER_DAY: i32 = 5;
const CORE_HOURS_BONUS: i32 = 20;
const BUSINESS_HOURS_BONUS: i32 = 10;
const WEEKDAY_BONUS: i32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConstraints {
    /// First start hour considered (inclusive, 0-23).
    pub earliest_hour: u32,
    /// Last start hour considered (inclusive, 0-23).
    pub latest_hour: u32,
    pub weekdays_only: bool,
}

impl Default for SlotConstraints {
    fn default() -> Self {
        Self {
            earliest_hour: 8,
            latest_hour: 17,
            weekdays_only: false,
        }
    }
}

impl SlotConstraints {
    fn validate(&self) -> Result<()> {
        if self.latest_hour > 23 {
            return Err(PlannerError::InvalidConstraints(format!(
                "latest hour {} is past 23",
                self.latest_hour
            )));
        }
        if self.earliest_hour > self.latest_hour {
            return Err(PlannerError::InvalidConstraints(format!(
                "earliest hour {} is after latest hour {}",
                self.earliest_hour, self.latest_hour
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub score: i32,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingSuggestion {
    pub job_id: Uuid,
    pub slots: Vec<ScoredSlot>,
}

/// Rank open slots for `job` against the assigned user's `existing` jobs.
///
/// The search starts on the preferred date (or `now`'s date) and never
/// proposes a slot starting before `now`. A job without an assigned user has
/// nothing to conflict with.
pub fn suggest_slots(
    job: &Job,
    preferred: Option<DateTime<Utc>>,
    constraints: &SlotConstraints,
    existing: &[Job],
    now: DateTime<Utc>,
    options: &SuggestOptions,
) -> Result<SchedulingSuggestion> {
    constraints.validate()?;
    let duration = job
        .estimated_duration_minutes
        .filter(|minutes| *minutes > 0)
        .ok_or(PlannerError::MissingDuration(job.id))?;
    let anchor = preferred.unwrap_or(now).date_naive();

    let mut slots: Vec<ScoredSlot> = (0..options.horizon_days)
        .into_par_iter()
        .map(|offset| day_slots(job, anchor, offset, duration, constraints, existing, now))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    // Stable: equal scores keep scan order.
    slots.sort_by(|a, b| b.score.cmp(&a.score));
    slots.truncate(options.max_suggestions);

    tracing::debug!(job_id = %job.id, suggestions = slots.len(), "slots suggested");

    Ok(SchedulingSuggestion {
        job_id: job.id,
        slots,
    })
}

fn day_slots(
    job: &Job,
    anchor: NaiveDate,
    offset: u32,
    duration: i64,
    constraints: &SlotConstraints,
    existing: &[Job],
    now: DateTime<Utc>,
) -> Result<Vec<ScoredSlot>> {
    let Some(day) = anchor.checked_add_days(Days::new(u64::from(offset))) else {
        return Ok(Vec::new());
    };
    let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
    if constraints.weekdays_only && weekend {
        return Ok(Vec::new());
    }

    let days_away = (day - anchor).num_days().abs() as i32;
    let mut slots = Vec::new();
    for hour in constraints.earliest_hour..=constraints.latest_hour {
        let Some(start) = day.and_hms_opt(hour, 0, 0).map(|naive| naive.and_utc()) else {
            continue;
        };
        if start < now {
            continue;
        }

        let free = match job.assigned_user_id {
            Some(user) => {
                check_scheduling_conflicts(job.id, Resource::User(user), start, duration, existing)
                    .is_empty()
            }
            None => true,
        };
        if !free {
            continue;
        }

        slots.push(ScoredSlot {
            start,
            end: add_minutes(start, duration).ok_or(PlannerError::DateOutOfRange)?,
            score: score(days_away, hour, constraints.weekdays_only && !weekend),
            available: true,
        });
    }
    Ok(slots)
}

fn score(days_away: i32, hour: u32, weekday_satisfied: bool) -> i32 {
    let mut score = BASE_SCORE - PENALTY_PER_DAY * days_away;
    if (9..=15).contains(&hour) {
        score += CORE_HOURS_BONUS;
    } else if (8..=17).contains(&hour) {
        score += BUSINESS_HOURS_BONUS;
    }
    if weekday_satisfied {
        score += WEEKDAY_BONUS;
    }
    score
}
