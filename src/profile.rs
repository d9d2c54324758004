//! User profile - basics, workout preferences and interests

use serde::{Deserialize, Serialize};

pub const GENDERS: &[&str] = &["male", "female", "other"];
pub const ACTIVITY_LEVELS: &[&str] = &["low", "medium", "high", "extreme"];

pub const MIN_AGE: u8 = 5;
pub const MAX_AGE: u8 = 115;
pub const MAX_WORKOUTS_PER_WEEK: u8 = 7;
pub const MAX_FAVORITE_LEN: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("age must be between 5 and 115, got {0}")]
    Age(u8),

    #[error("unknown {field}: {value:?}")]
    Choice { field: &'static str, value: String },

    #[error("workouts per week must satisfy 0 <= start <= end <= 7, got {start}-{end}")]
    Range { start: u8, end: u8 },

    #[error("favorite exercise must be 1 to 40 characters")]
    Favorite,

    #[error("no favorite exercise at index {0}")]
    NoSuchFavorite(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRange {
    pub start: u8,
    pub end: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub name: String,
    pub skill: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub activity_level: String,
    pub desired_workouts_per_week: WorkoutRange,
    #[serde(default)]
    pub favorite_exercises: Vec<String>,
    #[serde(default)]
    pub interests: Vec<Interest>,
}

/// Value after `current` in `options`, wrapping around
pub fn next_choice(options: &'static [&'static str], current: &str) -> &'static str {
    let pos = options.iter().position(|o| *o == current);
    match pos {
        Some(i) => options[(i + 1) % options.len()],
        None => options[0],
    }
}

/// Value before `current` in `options`, wrapping around
pub fn prev_choice(options: &'static [&'static str], current: &str) -> &'static str {
    let pos = options.iter().position(|o| *o == current);
    match pos {
        Some(0) | None => options[options.len() - 1],
        Some(i) => options[i - 1],
    }
}

fn choice(options: &[&str], field: &'static str, value: &str) -> Result<String, ProfileError> {
    let value = value.trim().to_lowercase();
    if options.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(ProfileError::Choice { field, value })
    }
}

impl UserProfile {
    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    pub fn set_age(&mut self, age: u8) -> Result<(), ProfileError> {
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(ProfileError::Age(age));
        }
        self.age = age;
        Ok(())
    }

    pub fn set_gender(&mut self, gender: &str) -> Result<(), ProfileError> {
        self.gender = choice(GENDERS, "gender", gender)?;
        Ok(())
    }

    pub fn set_activity_level(&mut self, level: &str) -> Result<(), ProfileError> {
        self.activity_level = choice(ACTIVITY_LEVELS, "activity level", level)?;
        Ok(())
    }

    pub fn set_desired_range(&mut self, start: u8, end: u8) -> Result<(), ProfileError> {
        if start > end || end > MAX_WORKOUTS_PER_WEEK {
            return Err(ProfileError::Range { start, end });
        }
        self.desired_workouts_per_week = WorkoutRange { start, end };
        Ok(())
    }

    /// Nudge the range start by `delta`; the end follows if needed
    pub fn step_range_start(&mut self, delta: i8) -> Result<(), ProfileError> {
        let WorkoutRange { start, end } = self.desired_workouts_per_week;
        let start = start.saturating_add_signed(delta).min(MAX_WORKOUTS_PER_WEEK);
        let end = end.max(start);
        self.set_desired_range(start, end)
    }

    /// Nudge the range end by `delta`, never below the start
    pub fn step_range_end(&mut self, delta: i8) -> Result<(), ProfileError> {
        let WorkoutRange { start, end } = self.desired_workouts_per_week;
        let end = end.saturating_add_signed(delta).clamp(start, MAX_WORKOUTS_PER_WEEK);
        self.set_desired_range(start, end)
    }

    pub fn add_favorite(&mut self, exercise: &str) -> Result<(), ProfileError> {
        let trimmed = exercise.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_FAVORITE_LEN {
            return Err(ProfileError::Favorite);
        }
        self.favorite_exercises.push(trimmed.to_string());
        Ok(())
    }

    pub fn remove_favorite(&mut self, index: usize) -> Result<String, ProfileError> {
        if index >= self.favorite_exercises.len() {
            return Err(ProfileError::NoSuchFavorite(index));
        }
        Ok(self.favorite_exercises.remove(index))
    }
}
