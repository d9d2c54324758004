//! groove - Personal workout tracker
//!
//! Weekly plan and profile come from JSON; sets are logged against the
//! plan in memory and grouped into exercise blocks for display.

pub mod fields;
pub mod loader;
pub mod profile;
pub mod tui;
pub mod workout;

pub use profile::UserProfile;
pub use workout::{DaySession, ExerciseSet, WeekPlan, WorkoutDay};
