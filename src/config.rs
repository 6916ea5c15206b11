//! Tunables for the planning components.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    /// Assumed average driving speed.
    pub average_speed_mph: f64,
    /// Flat on-site service time per stop, in minutes.
    pub service_minutes: i64,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            average_speed_mph: 30.0,
            service_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestOptions {
    /// Number of days searched from the preferred date.
    pub horizon_days: u32,
    pub max_suggestions: usize,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            max_suggestions: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesOptions {
    /// Cap on instances per series; a caller-supplied cap can only lower it.
    pub default_max_occurrences: u32,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            default_max_occurrences: 12,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub route: RouteOptions,
    pub suggest: SuggestOptions,
    pub series: SeriesOptions,
}

impl PlannerConfig {
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|err| PlannerError::Config(err.to_string()))
    }
}
