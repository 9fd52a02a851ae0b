//! Plan data model.
//!
//! Every value here is built fresh by [`super::generate_plan`] and never
//! mutated afterwards. Field names serialize in camelCase to match the
//! HTTP API and the session file.

use serde::{Deserialize, Serialize};

use crate::preferences::Preferences;

/// A single exercise prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    /// Free text: a count (`"5"`), a range (`"8-12"`), or a duration
    /// (`"30 seconds"`).
    pub reps: String,
}

/// A named, ordered cluster of exercises within one workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseGroup {
    pub name: String,
    pub exercises: Vec<Exercise>,
}

/// One training day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub title: String,
    pub description: String,
    /// Starts with Warm-up, ends with Cooldown.
    pub exercise_groups: Vec<ExerciseGroup>,
}

impl Workout {
    /// Total number of exercise lines across all groups.
    pub fn exercise_count(&self) -> usize {
        self.exercise_groups.iter().map(|g| g.exercises.len()).sum()
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&ExerciseGroup> {
        self.exercise_groups.iter().find(|g| g.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    /// 1-based week number.
    pub week_number: u32,
    /// 1-based phase, `ceil(week_number / 3)`.
    pub phase: u32,
    pub workouts: Vec<Workout>,
}

/// A complete 12-week program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub weeks: Vec<Week>,
    pub total_workouts: u32,
    pub preferences: Preferences,
}

impl Plan {
    /// The 1-based `week`, if in range.
    pub fn week(&self, week: u32) -> Option<&Week> {
        let idx = usize::try_from(week).ok()?.checked_sub(1)?;
        self.weeks.get(idx)
    }

    /// The workout on 1-based `day` of 1-based `week`, if in range.
    pub fn workout(&self, week: u32, day: u32) -> Option<&Workout> {
        let idx = usize::try_from(day).ok()?.checked_sub(1)?;
        self.week(week)?.workouts.get(idx)
    }
}
