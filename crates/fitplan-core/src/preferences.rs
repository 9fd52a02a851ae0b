//! Training preferences: the validated input to plan generation.
//!
//! [`PreferencesRequest`] is the raw, all-optional shape accepted over HTTP
//! and from the CLI. [`PreferencesRequest::validate`] turns it into a
//! [`Preferences`] or a [`PreferencesError`]; the generator itself never
//! sees unvalidated input.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed training days per week.
pub const DAYS_PER_WEEK: RangeInclusive<u8> = 2..=6;

/// Allowed workout length in minutes.
pub const MINUTES_PER_WORKOUT: RangeInclusive<u16> = 20..=90;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Primary training goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    LoseWeight,
    GetStronger,
    GetAthletic,
    BuildMuscle,
}

impl Goal {
    /// Every goal, in onboarding order.
    pub const ALL: [Goal; 4] = [
        Self::LoseWeight,
        Self::GetStronger,
        Self::GetAthletic,
        Self::BuildMuscle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoseWeight => "lose-weight",
            Self::GetStronger => "get-stronger",
            Self::GetAthletic => "get-athletic",
            Self::BuildMuscle => "build-muscle",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = PreferencesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| PreferencesError::InvalidGoal(s.to_owned()))
    }
}

/// Equipment the user has access to.
///
/// Recorded on the plan but not used to select exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Equipment {
    #[serde(rename = "none")]
    NoEquipment,
    Minimal,
    HomeGym,
    FullGym,
}

impl Equipment {
    pub const ALL: [Equipment; 4] = [
        Self::NoEquipment,
        Self::Minimal,
        Self::HomeGym,
        Self::FullGym,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoEquipment => "none",
            Self::Minimal => "minimal",
            Self::HomeGym => "home-gym",
            Self::FullGym => "full-gym",
        }
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Equipment {
    type Err = PreferencesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| PreferencesError::InvalidEquipment(s.to_owned()))
    }
}

/// Training experience level. Drives the set/rep intensity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
}

impl Experience {
    pub const ALL: [Experience; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Experience {
    type Err = PreferencesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| PreferencesError::InvalidExperience(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Validated training preferences. Immutable input to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub goal: Goal,
    /// Free-form focus id or text; empty when the user picked none.
    pub focus: String,
    pub equipment: Equipment,
    pub experience: Experience,
    pub days_per_week: u8,
    pub minutes_per_workout: u16,
}

impl Preferences {
    /// The focus, or `None` when empty.
    pub fn focus(&self) -> Option<&str> {
        Some(self.focus.as_str()).filter(|f| !f.is_empty())
    }
}

/// Raw preferences as submitted by a caller. Every field is optional so that
/// missing input surfaces as a [`PreferencesError::Missing`] rather than a
/// deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    pub goal: Option<String>,
    pub focus: Option<String>,
    pub equipment: Option<String>,
    pub experience: Option<String>,
    pub days_per_week: Option<i64>,
    pub minutes_per_workout: Option<i64>,
}

/// Errors from validating a [`PreferencesRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferencesError {
    #[error("missing required field: {0}")]
    Missing(&'static str),

    #[error("invalid goal: {0:?}")]
    InvalidGoal(String),

    #[error("invalid equipment: {0:?}")]
    InvalidEquipment(String),

    #[error("invalid experience level: {0:?}")]
    InvalidExperience(String),

    #[error("days per week must be between 2 and 6, got {0}")]
    DaysOutOfRange(i64),

    #[error("minutes per workout must be between 20 and 90, got {0}")]
    MinutesOutOfRange(i64),
}

impl PreferencesError {
    /// `true` for absent input, `false` for present-but-invalid input.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

impl PreferencesRequest {
    /// Validate and convert into [`Preferences`].
    ///
    /// Blank strings and zero numbers count as missing. `focus` is optional
    /// and is trimmed; any text is accepted.
    pub fn validate(&self) -> Result<Preferences, PreferencesError> {
        let goal = required_str(&self.goal, "goal")?;
        let equipment = required_str(&self.equipment, "equipment")?;
        let experience = required_str(&self.experience, "experience")?;
        let days = required_num(self.days_per_week, "daysPerWeek")?;
        let minutes = required_num(self.minutes_per_workout, "minutesPerWorkout")?;

        let days_per_week = u8::try_from(days)
            .ok()
            .filter(|d| DAYS_PER_WEEK.contains(d))
            .ok_or(PreferencesError::DaysOutOfRange(days))?;
        let minutes_per_workout = u16::try_from(minutes)
            .ok()
            .filter(|m| MINUTES_PER_WORKOUT.contains(m))
            .ok_or(PreferencesError::MinutesOutOfRange(minutes))?;

        Ok(Preferences {
            goal: goal.parse()?,
            focus: self.focus.as_deref().unwrap_or_default().trim().to_owned(),
            equipment: equipment.parse()?,
            experience: experience.parse()?,
            days_per_week,
            minutes_per_workout,
        })
    }
}

fn required_str<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, PreferencesError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(PreferencesError::Missing(field))
}

fn required_num(value: Option<i64>, field: &'static str) -> Result<i64, PreferencesError> {
    value.filter(|v| *v != 0).ok_or(PreferencesError::Missing(field))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
