//! Loader module - week plan and profile from bundled JSON or files
//!
//! Both documents are read once at startup and are read-only snapshots.
//! A missing or malformed document is fatal for the session.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::profile::UserProfile;
use crate::workout::WeekPlan;

/// Week plan shipped with the binary
pub const BUNDLED_WEEK: &str = include_str!("../data/week_1.json");

/// Profile shipped with the binary
pub const BUNDLED_PROFILE: &str = include_str!("../data/profile.json");

/// Decode a week plan and assign set ids
pub fn parse_week(json: &str) -> Result<WeekPlan> {
    let mut week: WeekPlan = serde_json::from_str(json).context("Failed to decode week plan")?;
    week.assign_ids();

    if week.is_empty() {
        warn!("week plan has no days");
    }
    Ok(week)
}

pub fn parse_profile(json: &str) -> Result<UserProfile> {
    serde_json::from_str(json).context("Failed to decode profile")
}

fn read(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("{} not found: {}", what, path.display()))
}

/// Load the week plan from `path`, or the bundled one
pub fn load_week(path: Option<&Path>) -> Result<WeekPlan> {
    let week = match path {
        Some(path) => {
            let json = read(path, "week plan")?;
            parse_week(&json).with_context(|| format!("in {}", path.display()))?
        }
        None => parse_week(BUNDLED_WEEK)?,
    };

    let sets: usize = week.days.iter().map(|d| d.workout.len()).sum();
    info!(days = week.days.len(), sets, "week plan loaded");
    Ok(week)
}

/// Load the profile from `path`, or the bundled one
pub fn load_profile(path: Option<&Path>) -> Result<UserProfile> {
    let profile = match path {
        Some(path) => {
            let json = read(path, "profile")?;
            parse_profile(&json).with_context(|| format!("in {}", path.display()))?
        }
        None => parse_profile(BUNDLED_PROFILE)?,
    };

    info!(name = %profile.name, "profile loaded");
    Ok(profile)
}
