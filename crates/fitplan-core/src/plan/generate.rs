//! Plan generation.
//!
//! A single synchronous pass over 12 weeks x `days_per_week` days that fills
//! the catalog templates for the requested goal, focus, and experience.
//! Pure and deterministic: identical preferences always produce identical
//! plans, and nothing is cached between calls.

use tracing::debug;

use crate::catalog::{
    self, COOLDOWN_GROUP, GoalProfile, GroupTemplate, Intensity, WARM_UP_GROUP,
};
use crate::preferences::Preferences;

use super::model::{Exercise, ExerciseGroup, Plan, Week, Workout};

/// Length of every program, in weeks.
pub const PROGRAM_WEEKS: u32 = 12;

/// Weeks per progression phase.
pub const WEEKS_PER_PHASE: u32 = 3;

const WARM_UP_EXERCISE: &str = "Dynamic Stretching";
const COOLDOWN_EXERCISE: &str = "Static Stretching";
const COOLDOWN_DURATION: &str = "5 mins";

/// Phase of a 1-based week: `ceil(week / 3)`, so weeks 1-3 are phase 1 and
/// weeks 10-12 are phase 4.
pub fn phase_for_week(week: u32) -> u32 {
    week.div_ceil(WEEKS_PER_PHASE)
}

/// Generate a 12-week plan for validated `preferences`.
pub fn generate_plan(preferences: &Preferences) -> Plan {
    let profile = catalog::catalog().goal(preferences.goal);
    let level = catalog::intensity(preferences.experience);
    let days = u32::from(preferences.days_per_week);

    let weeks: Vec<Week> = (1..=PROGRAM_WEEKS)
        .map(|week_number| {
            let phase = phase_for_week(week_number);
            let workouts = (1..=days)
                .map(|day| build_workout(profile, preferences, level, phase, day))
                .collect();
            Week {
                week_number,
                phase,
                workouts,
            }
        })
        .collect();

    debug!(
        goal = %preferences.goal,
        focus = preferences.focus(),
        experience = %preferences.experience,
        days,
        "generated {PROGRAM_WEEKS}-week plan"
    );

    Plan {
        weeks,
        total_workouts: days * PROGRAM_WEEKS,
        preferences: preferences.clone(),
    }
}

/// Build the workout for 1-based `day` within `phase`.
fn build_workout(
    profile: &GoalProfile,
    preferences: &Preferences,
    level: Intensity,
    phase: u32,
    day: u32,
) -> Workout {
    let focus = preferences.focus();
    let template = profile.template_for(focus);

    let mut exercise_groups = Vec::with_capacity(template.groups.len() + 2);
    exercise_groups.push(single_exercise_group(
        WARM_UP_GROUP,
        WARM_UP_EXERCISE,
        &profile.warmup,
    ));
    exercise_groups.extend(
        template
            .groups
            .iter()
            .map(|group| fill_group(group, level, day)),
    );
    exercise_groups.push(single_exercise_group(
        COOLDOWN_GROUP,
        COOLDOWN_EXERCISE,
        COOLDOWN_DURATION,
    ));

    Workout {
        title: profile.day_type(day).to_owned(),
        description: describe(profile.phase_label(phase), focus),
        exercise_groups,
    }
}

fn fill_group(group: &GroupTemplate, level: Intensity, day: u32) -> ExerciseGroup {
    ExerciseGroup {
        name: group.name.clone(),
        exercises: group
            .exercises_for_day(day)
            .iter()
            .map(|t| Exercise {
                name: t.name.clone(),
                sets: t.sets_for(level),
                reps: t.reps_for(level),
            })
            .collect(),
    }
}

fn single_exercise_group(group: &str, exercise: &str, duration: &str) -> ExerciseGroup {
    ExerciseGroup {
        name: group.to_owned(),
        exercises: vec![Exercise {
            name: exercise.to_owned(),
            sets: 1,
            reps: duration.to_owned(),
        }],
    }
}

fn describe(phase_label: &str, focus: Option<&str>) -> String {
    match focus {
        Some(focus) => format!("{phase_label} phase with {focus} focus"),
        None => format!("{phase_label} phase"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
