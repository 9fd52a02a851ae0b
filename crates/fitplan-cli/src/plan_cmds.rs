//! CLI handlers for plan commands.
//!
//! Implements:
//! - `fitplan generate ...`          -- generate a plan, optionally save it
//! - `fitplan dashboard`             -- current week of the saved plan
//! - `fitplan workout <week> <day>`  -- one workout in full

use std::fmt::Write as _;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};

use fitplan_core::plan::{PROGRAM_WEEKS, Plan, Workout, generate_plan};
use fitplan_core::preferences::PreferencesRequest;
use fitplan_core::session::{Session, SessionStore};

use crate::GenerateArgs;

// -----------------------------------------------------------------------
// fitplan generate
// -----------------------------------------------------------------------

pub fn run_generate(args: GenerateArgs, store: &SessionStore) -> Result<()> {
    let request = PreferencesRequest {
        goal: Some(args.goal),
        focus: args.focus,
        equipment: Some(args.equipment),
        experience: Some(args.experience),
        days_per_week: Some(args.days),
        minutes_per_workout: Some(args.minutes),
    };
    let preferences = request.validate().context("invalid preferences")?;

    let plan = if args.save {
        let session = Session::new(preferences, Utc::now());
        store.save(&session)?;
        session.plan
    } else {
        generate_plan(&preferences)
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).context("failed to serialize plan")?
        );
    } else {
        print!("{}", render_plan_summary(&plan));
    }

    if args.save {
        println!();
        println!("Saved to {}", store.path().display());
        println!("Run `fitplan dashboard` to see this week's workouts.");
    }
    Ok(())
}

// -----------------------------------------------------------------------
// fitplan dashboard
// -----------------------------------------------------------------------

pub fn run_dashboard(store: &SessionStore) -> Result<()> {
    let session = load_session(store)?;
    print!("{}", render_dashboard(&session, Utc::now()));
    Ok(())
}

// -----------------------------------------------------------------------
// fitplan workout <week> <day>
// -----------------------------------------------------------------------

pub fn run_workout(store: &SessionStore, week: u32, day: u32) -> Result<()> {
    let session = load_session(store)?;
    let workout = session
        .plan
        .workout(week, day)
        .with_context(|| format!("workout not found: week {week}, day {day}"))?;
    print!("{}", render_workout(workout, week, day));
    Ok(())
}

fn load_session(store: &SessionStore) -> Result<Session> {
    match store.load()? {
        Some(session) => Ok(session),
        None => bail!(
            "no saved plan at {}\nRun `fitplan generate ... --save` first.",
            store.path().display()
        ),
    }
}

// -----------------------------------------------------------------------
// Rendering
// -----------------------------------------------------------------------

fn render_plan_summary(plan: &Plan) -> String {
    let p = &plan.preferences;
    let mut out = String::new();
    let _ = writeln!(out, "{PROGRAM_WEEKS}-week plan: {}", p.goal);
    if let Some(focus) = p.focus() {
        let _ = writeln!(out, "  Focus:      {focus}");
    }
    let _ = writeln!(out, "  Experience: {}", p.experience);
    let _ = writeln!(out, "  Equipment:  {}", p.equipment);
    let _ = writeln!(
        out,
        "  Schedule:   {} days/week, {} min/workout",
        p.days_per_week, p.minutes_per_workout
    );
    let _ = writeln!(out, "  Workouts:   {}", plan.total_workouts);
    let _ = writeln!(out);

    for week in &plan.weeks {
        let titles: Vec<&str> = week.workouts.iter().map(|w| w.title.as_str()).collect();
        let _ = writeln!(
            out,
            "Week {:>2}  phase {}  {}",
            week.week_number,
            week.phase,
            titles.join(", ")
        );
    }
    out
}

fn render_dashboard(session: &Session, now: DateTime<Utc>) -> String {
    let current = session.current_week(now);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Week {current} of {PROGRAM_WEEKS} ({}% complete)",
        session.progress_percent(now)
    );
    let _ = writeln!(
        out,
        "Goal: {}  Started: {}",
        session.preferences.goal,
        session.created_at.format("%Y-%m-%d")
    );
    let _ = writeln!(out);

    let Some(week) = session.plan.week(current) else {
        return out;
    };
    for (i, workout) in week.workouts.iter().enumerate() {
        let _ = writeln!(
            out,
            "  Day {}: {} ({} exercises)",
            i + 1,
            workout.title,
            workout.exercise_count()
        );
        let _ = writeln!(out, "         {}", workout.description);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Run `fitplan workout {current} <day>` for details.");
    out
}

fn render_workout(workout: &Workout, week: u32, day: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Week {week}, Day {day}: {}", workout.title);
    let _ = writeln!(out, "{}", workout.description);
    for group in &workout.exercise_groups {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", group.name);
        for exercise in &group.exercises {
            let _ = writeln!(
                out,
                "  - {}: {} x {}",
                exercise.name, exercise.sets, exercise.reps
            );
        }
    }
    out
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
