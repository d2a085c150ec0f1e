//! Logging session builder.
//!
//! A [`Draft`] is the editable form of a workout being logged. It is built
//! from a scheduled [`WorkoutDay`], edited set by set, and finalized into an
//! immutable [`WorkoutLog`].

use crate::set_scheme::{leading_integer, parse_set_scheme};
use crate::{CompletedExercise, CompletedSet, WeekLabel, WorkoutDay, WorkoutLog};
use chrono::{Local, NaiveDate};
use uuid::Uuid;

/// Editable field of a set
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetField {
    Reps,
    Weight,
}

/// Workout being logged
///
/// Every exercise always keeps at least one set.
#[derive(Clone, Debug, PartialEq)]
pub struct Draft {
    exercises: Vec<CompletedExercise>,
}

/// Build a draft from a scheduled day
///
/// Each exercise gets the parsed number of sets (at least one), pre-filled
/// with the target reps (0 for AMRAP) and zero weight.
pub fn build_draft(day: &WorkoutDay) -> Draft {
    let exercises = day
        .exercises
        .iter()
        .map(|exercise| {
            let scheme = parse_set_scheme(&exercise.sets);
            let template = CompletedSet {
                reps: scheme.num_reps.unwrap_or(0),
                weight: 0.0,
            };
            CompletedExercise {
                name: exercise.name.clone(),
                sets: vec![template; scheme.num_sets.max(1) as usize],
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        "Built draft for {} with {} exercises",
        day.day,
        exercises.len()
    );

    Draft { exercises }
}

impl Draft {
    pub fn exercises(&self) -> &[CompletedExercise] {
        &self.exercises
    }

    pub fn into_exercises(self) -> Vec<CompletedExercise> {
        self.exercises
    }

    /// Set reps or weight from raw user input
    ///
    /// Non-numeric input becomes 0. Out-of-range indices are ignored.
    pub fn set_field(&mut self, exercise_index: usize, set_index: usize, field: SetField, value: &str) {
        let Some(set) = self
            .exercises
            .get_mut(exercise_index)
            .and_then(|exercise| exercise.sets.get_mut(set_index))
        else {
            tracing::debug!(
                "Ignoring edit of missing set {}:{}",
                exercise_index,
                set_index
            );
            return;
        };

        match field {
            SetField::Reps => set.reps = leading_integer(value).unwrap_or(0),
            SetField::Weight => set.weight = parse_weight(value),
        }
    }

    /// Append a zeroed set
    pub fn add_set(&mut self, exercise_index: usize) {
        if let Some(exercise) = self.exercises.get_mut(exercise_index) {
            exercise.sets.push(CompletedSet::default());
        }
    }

    /// Remove a set unless it is the exercise's last one
    pub fn remove_set(&mut self, exercise_index: usize, set_index: usize) {
        let Some(exercise) = self.exercises.get_mut(exercise_index) else {
            return;
        };
        if exercise.sets.len() <= 1 || set_index >= exercise.sets.len() {
            tracing::debug!("Refusing to remove set {} of {}", set_index, exercise.name);
            return;
        }
        exercise.sets.remove(set_index);
    }
}

fn parse_weight(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(weight) if weight.is_finite() && weight >= 0.0 => weight,
        _ => 0.0,
    }
}

/// Finalize a draft into a log dated today (local calendar date)
pub fn finalize(draft: Draft, day: &WorkoutDay, week: WeekLabel) -> WorkoutLog {
    finalize_on(draft, day, week, Local::now().date_naive())
}

/// Finalize a draft into a log for an explicit date
///
/// Set contents are kept as-is; zero sets record "not completed".
pub fn finalize_on(draft: Draft, day: &WorkoutDay, week: WeekLabel, date: NaiveDate) -> WorkoutLog {
    WorkoutLog {
        id: Uuid::new_v4(),
        date,
        week,
        day: day.day.clone(),
        workout_type: day.workout_type.clone(),
        exercises: draft.into_exercises(),
    }
}
