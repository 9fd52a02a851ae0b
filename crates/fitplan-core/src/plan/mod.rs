//! Workout plans: the data model and the template-driven generator.

pub mod generate;
pub mod model;

pub use generate::{PROGRAM_WEEKS, WEEKS_PER_PHASE, generate_plan, phase_for_week};
pub use model::{Exercise, ExerciseGroup, Plan, Week, Workout};
