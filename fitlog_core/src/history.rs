//! Workout history loading.
//!
//! Loads logs from a [`WorkoutStore`], drops duplicate ids and returns them
//! newest first.

use crate::store::WorkoutStore;
use crate::{Result, WorkoutLog};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Load the full history, newest date first
pub fn load_history(store: &impl WorkoutStore) -> Result<Vec<WorkoutLog>> {
    let logs = store.load_logs()?;
    let history = dedupe_newest_first(logs);
    tracing::info!("Loaded {} workouts", history.len());
    Ok(history)
}

/// Load logs dated within `days` days before `today` (inclusive), newest first
pub fn load_recent_history(
    store: &impl WorkoutStore,
    today: NaiveDate,
    days: i64,
) -> Result<Vec<WorkoutLog>> {
    let cutoff = today - Duration::days(days);
    let recent: Vec<WorkoutLog> = load_history(store)?
        .into_iter()
        .filter(|log| log.date >= cutoff)
        .collect();

    tracing::debug!("{} workouts in the last {} days", recent.len(), days);
    Ok(recent)
}

/// First occurrence of each id wins; the sort is stable within a date
fn dedupe_newest_first(logs: Vec<WorkoutLog>) -> Vec<WorkoutLog> {
    let mut seen_ids = HashSet::new();
    let mut unique: Vec<WorkoutLog> = logs
        .into_iter()
        .filter(|log| seen_ids.insert(log.id))
        .collect();

    unique.sort_by(|a, b| b.date.cmp(&a.date));
    unique
}

/// Most recent log that includes `exercise_name`
pub fn last_performance<'a>(
    history: &'a [WorkoutLog],
    exercise_name: &str,
) -> Option<&'a WorkoutLog> {
    // History is sorted newest first
    history
        .iter()
        .find(|log| log.exercises.iter().any(|e| e.name == exercise_name))
}
