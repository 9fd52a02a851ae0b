//! Workout template catalog.
//!
//! The rules table behind plan generation lives in `catalog.toml`, embedded
//! in the binary at compile time: per-goal day-type rotations, phase labels,
//! focus options, and the exercise-group templates keyed by focus. Lookups
//! are by [`Goal`] and focus id; nothing here branches on strings.

use std::collections::HashSet;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::preferences::{DAYS_PER_WEEK, Equipment, Experience, Goal, MINUTES_PER_WORKOUT};

/// Number of entries in every goal's day-type rotation.
pub const DAY_TYPE_COUNT: usize = 6;

/// Number of 3-week phases in the program.
pub const PHASE_COUNT: usize = 4;

/// Rep text that expands to the experience-level range.
pub const LEVEL_REPS: &str = "level";

/// Group names the generator adds around every template.
pub const WARM_UP_GROUP: &str = "Warm-up";
pub const COOLDOWN_GROUP: &str = "Cooldown";

// ---------------------------------------------------------------------------
// Intensity
// ---------------------------------------------------------------------------

/// Set and rep parameters for an experience level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Intensity {
    pub sets: u32,
    pub reps_min: u32,
    pub reps_max: u32,
}

/// The intensity table: beginner 2x8-12, intermediate 3x8-12, advanced 4x6-12.
pub fn intensity(experience: Experience) -> Intensity {
    match experience {
        Experience::Beginner => Intensity {
            sets: 2,
            reps_min: 8,
            reps_max: 12,
        },
        Experience::Intermediate => Intensity {
            sets: 3,
            reps_min: 8,
            reps_max: 12,
        },
        Experience::Advanced => Intensity {
            sets: 4,
            reps_min: 6,
            reps_max: 12,
        },
    }
}

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// An onboarding choice with its display label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice<T> {
    pub id: T,
    pub label: String,
}

/// A focus refinement offered for a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusOption {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// One exercise line in a template.
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseTemplate {
    pub name: String,
    /// Fixed set count. `None` means the experience-level sets.
    pub sets: Option<u32>,
    /// Added to the experience-level sets. Ignored when `sets` is fixed.
    #[serde(default)]
    pub bonus_sets: u32,
    /// Literal rep text, or [`LEVEL_REPS`].
    pub reps: String,
    /// Lower bound applied to the level range minimum.
    pub reps_floor: Option<u32>,
}

impl ExerciseTemplate {
    /// Resolve the set count for `level`.
    pub fn sets_for(&self, level: Intensity) -> u32 {
        self.sets.unwrap_or(level.sets + self.bonus_sets)
    }

    /// Resolve the rep text for `level`.
    pub fn reps_for(&self, level: Intensity) -> String {
        if self.reps == LEVEL_REPS {
            let min = self.reps_floor.map_or(level.reps_min, |f| f.max(level.reps_min));
            format!("{min}-{}", level.reps_max)
        } else {
            self.reps.clone()
        }
    }
}

/// A named group of exercises in a template.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupTemplate {
    pub name: String,
    /// Emit only `exercises[day % len]` instead of every exercise.
    #[serde(default)]
    pub rotate: bool,
    pub exercises: Vec<ExerciseTemplate>,
}

impl GroupTemplate {
    /// The exercises this group contributes to the workout on `day`.
    pub fn exercises_for_day(&self, day: u32) -> &[ExerciseTemplate] {
        if self.rotate && !self.exercises.is_empty() {
            let idx = day as usize % self.exercises.len();
            &self.exercises[idx..=idx]
        } else {
            &self.exercises
        }
    }
}

/// Exercise groups used for one focus (or the goal default).
#[derive(Debug, Clone, Deserialize)]
pub struct FocusTemplate {
    /// Focus id this template specializes. `None` for the goal default.
    pub focus: Option<String>,
    pub groups: Vec<GroupTemplate>,
}

/// Everything the generator needs to know about one goal.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalProfile {
    pub id: Goal,
    pub title: String,
    pub description: String,
    pub day_types: Vec<String>,
    pub phase_labels: Vec<String>,
    /// Duration text of the warm-up stretch.
    pub warmup: String,
    pub focus_options: Vec<FocusOption>,
    pub templates: Vec<FocusTemplate>,
}

impl GoalProfile {
    /// Title for the 1-based training `day`: `day_types[day % 6]`.
    pub fn day_type(&self, day: u32) -> &str {
        &self.day_types[day as usize % self.day_types.len()]
    }

    /// Label for a 1-based `phase`, clamped into the label list.
    pub fn phase_label(&self, phase: u32) -> &str {
        let idx = (phase.max(1) as usize - 1).min(self.phase_labels.len() - 1);
        &self.phase_labels[idx]
    }

    /// The template for `focus`: an exact focus-id match, else the default.
    pub fn template_for(&self, focus: Option<&str>) -> &FocusTemplate {
        focus
            .and_then(|f| {
                self.templates
                    .iter()
                    .find(|t| t.focus.as_deref() == Some(f))
            })
            .unwrap_or_else(|| self.default_template())
    }

    /// The template used when no focus matches.
    pub fn default_template(&self) -> &FocusTemplate {
        // Catalog::validate guarantees exactly one default per goal.
        self.templates
            .iter()
            .find(|t| t.focus.is_none())
            .unwrap_or(&self.templates[0])
    }
}

/// The full template catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub equipment: Vec<Choice<Equipment>>,
    pub experience: Vec<Choice<Experience>>,
    pub goals: Vec<GoalProfile>,
}

/// Errors from loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("goal {0} has no profile")]
    MissingGoal(Goal),

    #[error("goal {0} is defined more than once")]
    DuplicateGoal(Goal),

    #[error("goal {goal} has {count} day types (expected 6)")]
    DayTypes { goal: Goal, count: usize },

    #[error("goal {goal} has {count} phase labels (expected 4)")]
    PhaseLabels { goal: Goal, count: usize },

    #[error("goal {goal} has {count} default templates (expected 1)")]
    DefaultTemplates { goal: Goal, count: usize },

    #[error("goal {goal} has more than one template for focus {focus:?}")]
    DuplicateTemplate { goal: Goal, focus: String },

    #[error("goal {goal} lists focus option {focus:?} twice")]
    DuplicateFocusOption { goal: Goal, focus: String },

    #[error("group {group:?} in goal {goal} has no exercises")]
    EmptyGroup { goal: Goal, group: String },

    #[error("group name {group:?} in goal {goal} is reserved for the generator")]
    ReservedGroup { goal: Goal, group: String },
}

/// The embedded catalog TOML.
static CATALOG_TOML: &str = include_str!("catalog.toml");

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
    Catalog::from_toml(CATALOG_TOML)
        .unwrap_or_else(|e| panic!("embedded catalog.toml is invalid: {e}"))
});

/// The embedded catalog, parsed and validated on first use.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed. The `embedded_catalog_is_valid`
/// test covers this, so a tested build cannot ship a broken catalog.
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

impl Catalog {
    /// Parse and validate a catalog from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The profile for `goal`.
    pub fn goal(&self, goal: Goal) -> &GoalProfile {
        // Catalog::validate guarantees every goal is present.
        self.goals
            .iter()
            .find(|p| p.id == goal)
            .unwrap_or(&self.goals[0])
    }

    /// Check the structural rules the generator relies on.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for profile in &self.goals {
            if !seen.insert(profile.id) {
                return Err(CatalogError::DuplicateGoal(profile.id));
            }
        }
        if let Some(missing) = Goal::ALL.into_iter().find(|g| !seen.contains(g)) {
            return Err(CatalogError::MissingGoal(missing));
        }

        for profile in &self.goals {
            validate_profile(profile)?;
        }
        Ok(())
    }

    /// The onboarding choices, without the templates.
    pub fn options(&self) -> CatalogOptions {
        CatalogOptions {
            goals: self
                .goals
                .iter()
                .map(|p| GoalOption {
                    id: p.id,
                    title: p.title.clone(),
                    description: p.description.clone(),
                    focus_options: p.focus_options.clone(),
                })
                .collect(),
            equipment: self.equipment.clone(),
            experience: self.experience.clone(),
            days_per_week: DAYS_PER_WEEK.collect(),
            minutes_per_workout: MinutesRange {
                min: *MINUTES_PER_WORKOUT.start(),
                max: *MINUTES_PER_WORKOUT.end(),
                step: 5,
            },
        }
    }
}

fn validate_profile(profile: &GoalProfile) -> Result<(), CatalogError> {
    let goal = profile.id;
    if profile.day_types.len() != DAY_TYPE_COUNT {
        return Err(CatalogError::DayTypes {
            goal,
            count: profile.day_types.len(),
        });
    }
    if profile.phase_labels.len() != PHASE_COUNT {
        return Err(CatalogError::PhaseLabels {
            goal,
            count: profile.phase_labels.len(),
        });
    }

    let defaults = profile.templates.iter().filter(|t| t.focus.is_none()).count();
    if defaults != 1 {
        return Err(CatalogError::DefaultTemplates {
            goal,
            count: defaults,
        });
    }

    let mut focuses = HashSet::new();
    for focus in profile.templates.iter().filter_map(|t| t.focus.as_deref()) {
        if !focuses.insert(focus) {
            return Err(CatalogError::DuplicateTemplate {
                goal,
                focus: focus.to_owned(),
            });
        }
    }

    let mut options = HashSet::new();
    for option in &profile.focus_options {
        if !options.insert(option.id.as_str()) {
            return Err(CatalogError::DuplicateFocusOption {
                goal,
                focus: option.id.clone(),
            });
        }
    }

    for group in profile.templates.iter().flat_map(|t| &t.groups) {
        if group.name == WARM_UP_GROUP || group.name == COOLDOWN_GROUP {
            return Err(CatalogError::ReservedGroup {
                goal,
                group: group.name.clone(),
            });
        }
        if group.exercises.is_empty() {
            return Err(CatalogError::EmptyGroup {
                goal,
                group: group.name.clone(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Onboarding view
// ---------------------------------------------------------------------------

/// Serializable onboarding choices, served by `GET /api/options`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOptions {
    pub goals: Vec<GoalOption>,
    pub equipment: Vec<Choice<Equipment>>,
    pub experience: Vec<Choice<Experience>>,
    pub days_per_week: Vec<u8>,
    pub minutes_per_workout: MinutesRange,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalOption {
    pub id: Goal,
    pub title: String,
    pub description: String,
    pub focus_options: Vec<FocusOption>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MinutesRange {
    pub min: u16,
    pub max: u16,
    pub step: u16,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
