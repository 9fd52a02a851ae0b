//! A user's saved plan and where they are in it.
//!
//! The session is an explicit record loaded by whoever needs it: the
//! generated plan, the preferences that produced it, and the moment it was
//! created. The current week is derived from the creation time on demand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::paths;
use crate::plan::{PROGRAM_WEEKS, Plan, generate_plan};
use crate::preferences::Preferences;

/// The 1-based program week for a plan created at `created_at`:
/// `floor((now - created_at) / 1 week) + 1`, clamped to `1..=12`.
///
/// Timestamps in the future yield week 1.
pub fn current_week(created_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let week_ms = Duration::weeks(1).num_milliseconds();
    let elapsed_ms = (now - created_at).num_milliseconds();
    let elapsed_weeks = elapsed_ms.div_euclid(week_ms);
    let week = elapsed_weeks.saturating_add(1).clamp(1, i64::from(PROGRAM_WEEKS));
    // Clamped into 1..=12, so the conversion cannot fail.
    u32::try_from(week).unwrap_or(PROGRAM_WEEKS)
}

/// A generated plan together with its inputs and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub preferences: Preferences,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Generate a plan for `preferences` and start the program at `now`.
    pub fn new(preferences: Preferences, now: DateTime<Utc>) -> Self {
        let plan = generate_plan(&preferences);
        Self {
            preferences,
            plan,
            created_at: now,
        }
    }

    /// The current program week at `now`.
    pub fn current_week(&self, now: DateTime<Utc>) -> u32 {
        current_week(self.created_at, now)
    }

    /// Share of the program reached at `now`, rounded to a whole percent.
    pub fn progress_percent(&self, now: DateTime<Utc>) -> u32 {
        let week = self.current_week(now);
        (week * 100 + PROGRAM_WEEKS / 2) / PROGRAM_WEEKS
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// JSON file holding at most one [`Session`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session. `Ok(None)` when nothing has been saved.
    pub fn load(&self) -> Result<Option<Session>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to read session file at {}", self.path.display())
                });
            }
        };
        let session = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse session file at {}", self.path.display()))?;
        Ok(Some(session))
    }

    /// Write `session`, replacing any previous one.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        let contents =
            serde_json::to_string_pretty(session).context("failed to serialize session")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("failed to write session file at {}", self.path.display()))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the saved session. Returns `true` if one existed.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| {
                format!("failed to remove session file at {}", self.path.display())
            }),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(paths::session_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{Equipment, Experience, Goal};
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap()
    }

    fn preferences() -> Preferences {
        Preferences {
            goal: Goal::BuildMuscle,
            focus: "upper-body".to_owned(),
            equipment: Equipment::HomeGym,
            experience: Experience::Intermediate,
            days_per_week: 4,
            minutes_per_workout: 60,
        }
    }

    #[test]
    fn first_week_until_seven_days_pass() {
        let t0 = start();
        assert_eq!(current_week(t0, t0), 1);
        assert_eq!(current_week(t0, t0 + Duration::days(6)), 1);
        assert_eq!(
            current_week(t0, t0 + Duration::weeks(1) - Duration::milliseconds(1)),
            1
        );
        assert_eq!(current_week(t0, t0 + Duration::weeks(1)), 2);
        assert_eq!(current_week(t0, t0 + Duration::days(80)), 12);
    }

    #[test]
    fn current_week_clamps_long_ago_plans() {
        let t0 = start();
        assert_eq!(current_week(t0, t0 + Duration::weeks(40)), 12);
    }

    #[test]
    fn current_week_clamps_future_plans() {
        let t0 = start();
        assert_eq!(current_week(t0, t0 - Duration::days(1)), 1);
        assert_eq!(current_week(t0, t0 - Duration::weeks(30)), 1);
    }

    #[test]
    fn progress_rounds_to_whole_percent() {
        let t0 = start();
        let session = Session::new(preferences(), t0);
        assert_eq!(session.progress_percent(t0), 8);
        assert_eq!(session.progress_percent(t0 + Duration::weeks(5)), 50);
        assert_eq!(session.progress_percent(t0 + Duration::weeks(11)), 100);
    }

    #[test]
    fn new_session_generates_plan() {
        let session = Session::new(preferences(), start());
        assert_eq!(session.plan.total_workouts, 48);
        assert_eq!(session.plan.preferences, session.preferences);
    }

    #[test]
    fn store_round_trip_and_clear() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path().join("nested").join("session.json"));

        assert!(store.load().unwrap().is_none());
        assert!(!store.clear().unwrap());

        let session = Session::new(preferences(), start());
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        assert!(store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_session_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = SessionStore::new(&path).load().unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse session file"));
    }
}
