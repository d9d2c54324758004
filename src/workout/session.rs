//! Day session - working copy of one day while it is on screen
//!
//! All edits go through explicit methods addressed by set index. Nothing
//! is written back to the week plan: dropping the session drops the edits.

use tracing::{debug, info};

use super::blocks::{self, Block, BlockError};
use super::{Exertion, ExerciseSet, SetId, WorkoutDay};
use crate::fields::parse_number;

/// Result of committing text into a numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOutcome {
    Applied(f64),
    /// Text was not a number (or the field is not editable); value kept
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no set at index {index} ({len} sets)")]
    NoSuchSet { index: usize, len: usize },
}

#[derive(Debug, Clone)]
pub struct DaySession {
    day: String,
    sets: Vec<ExerciseSet>,
}

impl DaySession {
    pub fn new(day: &WorkoutDay) -> Self {
        debug!(day = %day.day, sets = day.workout.len(), "opening day session");
        Self {
            day: day.day.clone(),
            sets: day.workout.clone(),
        }
    }

    pub fn day_name(&self) -> &str {
        &self.day
    }

    pub fn sets(&self) -> &[ExerciseSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ExerciseSet> {
        self.sets.get(index)
    }

    /// Current blocks, recomputed from the sets
    pub fn blocks(&self) -> Vec<Block<'_>> {
        blocks::group(&self.sets)
    }

    pub fn position_of(&self, id: SetId) -> Option<usize> {
        self.sets.iter().position(|s| s.id == id)
    }

    fn set_mut(&mut self, index: usize) -> Result<&mut ExerciseSet, SessionError> {
        let len = self.sets.len();
        self.sets
            .get_mut(index)
            .ok_or(SessionError::NoSuchSet { index, len })
    }

    /// Commit typed text as the actual amount
    pub fn edit_actual_amount(&mut self, index: usize, text: &str) -> Result<EditOutcome, SessionError> {
        let set = self.set_mut(index)?;
        Ok(match parse_number(text) {
            Some(value) => {
                set.actual_amount = value;
                debug!(index, value, "actual amount updated");
                EditOutcome::Applied(value)
            }
            None => EditOutcome::Ignored,
        })
    }

    /// Commit typed text as the actual intensity
    pub fn edit_actual_intensity(&mut self, index: usize, text: &str) -> Result<EditOutcome, SessionError> {
        let set = self.set_mut(index)?;
        if !set.has_intensity() {
            return Ok(EditOutcome::Ignored);
        }
        Ok(match parse_number(text) {
            Some(value) => {
                set.actual_intensity = value;
                debug!(index, value, "actual intensity updated");
                EditOutcome::Applied(value)
            }
            None => EditOutcome::Ignored,
        })
    }

    pub fn set_exertion(&mut self, index: usize, exertion: Option<Exertion>) -> Result<(), SessionError> {
        self.set_mut(index)?.perceived_exertion = exertion;
        Ok(())
    }

    /// Returns the new completion state
    pub fn toggle_done(&mut self, index: usize) -> Result<bool, SessionError> {
        let set = self.set_mut(index)?;
        set.done = !set.done;
        Ok(set.done)
    }

    /// Move a whole block; all-or-nothing
    pub fn move_block(&mut self, source: usize, destination: usize) -> Result<(), BlockError> {
        blocks::move_block(&mut self.sets, source, destination)?;
        info!(day = %self.day, source, destination, "block moved");
        Ok(())
    }

    /// (done, total)
    pub fn progress(&self) -> (usize, usize) {
        let done = self.sets.iter().filter(|s| s.done).count();
        (done, self.sets.len())
    }

    pub fn is_complete(&self) -> bool {
        !self.sets.is_empty() && self.sets.iter().all(|s| s.done)
    }
}
