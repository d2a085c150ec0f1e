//! Weekly training frequency and volume.
//!
//! Weeks start on Monday. The output is sparse: weeks without any logged
//! workout are not emitted, so consecutive records are not necessarily
//! seven days apart.

use crate::{CompletedExercise, WorkoutLog};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate for one Monday-start week
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub workout_count: u32,
    pub volume: f64,
}

/// Monday on or before `date` (a Sunday belongs to the preceding Monday)
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sum of reps x weight over an exercise's sets
pub fn exercise_volume(exercise: &CompletedExercise) -> f64 {
    exercise.sets.iter().map(|set| set.volume()).sum()
}

/// Sum of reps x weight over every set of a workout
pub fn log_volume(log: &WorkoutLog) -> f64 {
    log.exercises.iter().map(exercise_volume).sum()
}

/// Group logs by week, oldest week first
pub fn weekly_summaries(logs: &[WorkoutLog]) -> Vec<WeeklySummary> {
    let mut weeks: BTreeMap<NaiveDate, WeeklySummary> = BTreeMap::new();

    for log in logs {
        let start = week_start(log.date);
        let summary = weeks.entry(start).or_insert_with(|| WeeklySummary {
            week_start: start,
            workout_count: 0,
            volume: 0.0,
        });
        summary.workout_count += 1;
        summary.volume += log_volume(log);
    }

    tracing::debug!(
        "Aggregated {} logs into {} weeks",
        logs.len(),
        weeks.len()
    );

    weeks.into_values().collect()
}
