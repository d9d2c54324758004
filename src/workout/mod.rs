//! Workout module - weekly plan, days and exercise sets

pub mod blocks;
pub mod session;

pub use blocks::{Block, BlockError};
pub use session::{DaySession, EditOutcome, SessionError};

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque set identity, assigned on load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SetId(pub u64);

/// User-reported difficulty of a set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Exertion {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown perceived exertion: {0:?}")]
pub struct ParseExertionError(pub String);

impl Exertion {
    pub fn label(&self) -> &'static str {
        match self {
            Exertion::Easy => "Easy",
            Exertion::Medium => "Medium",
            Exertion::Hard => "Hard",
        }
    }

    /// Menu cycle: unset -> Easy -> Medium -> Hard -> unset
    pub fn cycle(current: Option<Exertion>) -> Option<Exertion> {
        match current {
            None => Some(Exertion::Easy),
            Some(Exertion::Easy) => Some(Exertion::Medium),
            Some(Exertion::Medium) => Some(Exertion::Hard),
            Some(Exertion::Hard) => None,
        }
    }

    /// Label for an optional exertion, `?` when unset
    pub fn display(exertion: Option<Exertion>) -> &'static str {
        exertion.map_or("?", |e| e.label())
    }
}

impl fmt::Display for Exertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Exertion {
    type Err = ParseExertionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Low/High come from the first revision of the plan files
        match s.trim().to_lowercase().as_str() {
            "easy" | "low" => Ok(Exertion::Easy),
            "medium" => Ok(Exertion::Medium),
            "hard" | "high" => Ok(Exertion::Hard),
            _ => Err(ParseExertionError(s.to_string())),
        }
    }
}

fn deserialize_exertion<'de, D>(deserializer: D) -> Result<Option<Exertion>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("?") => Ok(None),
        Some(label) => label.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// One planned/performed unit of exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSet {
    #[serde(skip)]
    pub id: SetId,
    pub exercise: String,
    pub amount: f64,
    pub actual_amount: f64,
    pub amount_unit: String,
    pub intensity: f64,
    pub actual_intensity: f64,
    pub intensity_unit: String,
    #[serde(default, deserialize_with = "deserialize_exertion")]
    pub perceived_exertion: Option<Exertion>,
    #[serde(default)]
    pub done: bool,
}

impl ExerciseSet {
    /// Sets measured without intensity carry the unit "none"
    pub fn has_intensity(&self) -> bool {
        !self.intensity_unit.eq_ignore_ascii_case("none")
    }
}

// Identity is not part of equality
impl PartialEq for ExerciseSet {
    fn eq(&self, other: &Self) -> bool {
        self.exercise == other.exercise
            && self.amount == other.amount
            && self.actual_amount == other.actual_amount
            && self.amount_unit == other.amount_unit
            && self.intensity == other.intensity
            && self.actual_intensity == other.actual_intensity
            && self.intensity_unit == other.intensity_unit
            && self.perceived_exertion == other.perceived_exertion
            && self.done == other.done
    }
}

/// A named day of the weekly plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub day: String,
    pub workout: Vec<ExerciseSet>,
}

impl WorkoutDay {
    /// Weekday this day is named after, if any ("Monday", "mon", ...)
    pub fn weekday(&self) -> Option<Weekday> {
        self.day.trim().parse().ok()
    }
}

/// Ordered list of workout days
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekPlan {
    pub days: Vec<WorkoutDay>,
}

impl WeekPlan {
    /// Give every set in the plan a distinct id
    pub fn assign_ids(&mut self) {
        let sets = self.days.iter_mut().flat_map(|d| d.workout.iter_mut());
        for (n, set) in sets.enumerate() {
            set.id = SetId(n as u64);
        }
    }

    /// Find a day by name (case-insensitive) or by 1-based number
    pub fn find_day(&self, query: &str) -> Option<(usize, &WorkoutDay)> {
        let query = query.trim();
        if let Some(found) = self
            .days
            .iter()
            .enumerate()
            .find(|(_, d)| d.day.eq_ignore_ascii_case(query))
        {
            return Some(found);
        }
        match query.parse::<usize>() {
            Ok(n) if n >= 1 => self.days.get(n - 1).map(|d| (n - 1, d)),
            _ => None,
        }
    }

    /// Day scheduled for the given weekday, falling back to the first day
    pub fn day_for(&self, weekday: Weekday) -> Option<(usize, &WorkoutDay)> {
        self.days
            .iter()
            .enumerate()
            .find(|(_, d)| d.weekday() == Some(weekday))
            .or_else(|| self.days.first().map(|d| (0, d)))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn test_set(exercise: &str, amount: f64) -> ExerciseSet {
    ExerciseSet {
        id: SetId::default(),
        exercise: exercise.to_string(),
        amount,
        actual_amount: amount,
        amount_unit: "reps".to_string(),
        intensity: 20.0,
        actual_intensity: 20.0,
        intensity_unit: "kg".to_string(),
        perceived_exertion: None,
        done: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SET_JSON: &str = r#"{
        "exercise": "Squat",
        "amount": 10,
        "actual_amount": 0,
        "amount_unit": "reps",
        "intensity": 60,
        "actual_intensity": 0,
        "intensity_unit": "kg",
        "perceived_exertion": "Medium"
    }"#;

    fn parse_set(json: &str) -> serde_json::Result<ExerciseSet> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_decode_snake_case_set() {
        let set = parse_set(SET_JSON).unwrap();
        assert_eq!(set.exercise, "Squat");
        assert_eq!(set.amount, 10.0);
        assert_eq!(set.amount_unit, "reps");
        assert_eq!(set.intensity, 60.0);
        assert_eq!(set.perceived_exertion, Some(Exertion::Medium));
        assert!(!set.done, "done defaults to false");
    }

    #[test]
    fn test_decode_unset_exertion() {
        for raw in [r#""""#, "null", r#""?""#, r#""  ""#] {
            let json = SET_JSON.replace(r#""Medium""#, raw);
            let set = parse_set(&json).unwrap();
            assert_eq!(set.perceived_exertion, None, "raw value {raw}");
        }

        let missing = r#"{
            "exercise": "Squat", "amount": 10, "actual_amount": 0, "amount_unit": "reps",
            "intensity": 0, "actual_intensity": 0, "intensity_unit": "none", "done": true
        }"#;
        let set = parse_set(missing).unwrap();
        assert_eq!(set.perceived_exertion, None);
        assert!(set.done);
    }

    #[test]
    fn test_decode_exertion_aliases() {
        assert_eq!("low".parse::<Exertion>(), Ok(Exertion::Easy));
        assert_eq!("HARD".parse::<Exertion>(), Ok(Exertion::Hard));
        assert_eq!("High".parse::<Exertion>(), Ok(Exertion::Hard));
        assert!("brutal".parse::<Exertion>().is_err());

        let json = SET_JSON.replace("Medium", "brutal");
        assert!(parse_set(&json).is_err());
    }

    #[test]
    fn test_exertion_cycle() {
        let mut current = None;
        let mut seen = Vec::new();
        for _ in 0..4 {
            current = Exertion::cycle(current);
            seen.push(current);
        }
        assert_eq!(
            seen,
            vec![Some(Exertion::Easy), Some(Exertion::Medium), Some(Exertion::Hard), None]
        );
        assert_eq!(Exertion::display(None), "?");
        assert_eq!(Exertion::display(Some(Exertion::Hard)), "Hard");
    }

    #[test]
    fn test_equality_ignores_id() {
        let mut a = test_set("Squat", 10.0);
        let mut b = a.clone();
        a.id = SetId(1);
        b.id = SetId(2);
        assert_eq!(a, b);

        b.done = true;
        assert_ne!(a, b);
    }

    #[test]
    fn test_intensity_unit_none() {
        let mut set = test_set("Plank", 60.0);
        assert!(set.has_intensity());
        set.intensity_unit = "None".to_string();
        assert!(!set.has_intensity());
    }

    #[test]
    fn test_assign_ids_distinct() {
        let mut week = WeekPlan {
            days: vec![
                WorkoutDay { day: "Monday".into(), workout: vec![test_set("A", 1.0), test_set("A", 2.0)] },
                WorkoutDay { day: "Tuesday".into(), workout: vec![test_set("B", 1.0)] },
            ],
        };
        week.assign_ids();
        let ids: Vec<_> = week.days.iter().flat_map(|d| d.workout.iter().map(|s| s.id)).collect();
        assert_eq!(ids, vec![SetId(0), SetId(1), SetId(2)]);
    }

    #[test]
    fn test_find_day() {
        let week = WeekPlan {
            days: vec![
                WorkoutDay { day: "Monday".into(), workout: vec![] },
                WorkoutDay { day: "Wednesday".into(), workout: vec![] },
            ],
        };
        assert_eq!(week.find_day("wednesday").map(|(i, _)| i), Some(1));
        assert_eq!(week.find_day("1").map(|(i, _)| i), Some(0));
        assert!(week.find_day("0").is_none());
        assert!(week.find_day("3").is_none());
        assert!(week.find_day("Friday").is_none());
    }

    #[test]
    fn test_day_for_weekday() {
        let week = WeekPlan {
            days: vec![
                WorkoutDay { day: "Monday".into(), workout: vec![] },
                WorkoutDay { day: "Thursday".into(), workout: vec![] },
            ],
        };
        assert_eq!(week.day_for(Weekday::Thu).map(|(i, _)| i), Some(1));
        // No Sunday session planned: first day
        assert_eq!(week.day_for(Weekday::Sun).map(|(i, _)| i), Some(0));
        assert!(WeekPlan::default().day_for(Weekday::Mon).is_none());
    }
}
