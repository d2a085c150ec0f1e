//! Workout schedule and the A/B day mapping.
//!
//! Monday, Wednesday and Friday are week A days; Tuesday, Thursday and
//! Saturday are week B days; Sunday is rest.

use crate::{Exercise, Result, WeekLabel, WorkoutDay, WorkoutLog, WorkoutSchedule};
use chrono::{NaiveDate, Weekday};
use once_cell::sync::Lazy;
use std::path::Path;

static DEFAULT_SCHEDULE: Lazy<WorkoutSchedule> = Lazy::new(build_default_schedule);

/// The plan for one calendar day
#[derive(Clone, Debug, PartialEq)]
pub struct DayPlan {
    pub week: WeekLabel,
    pub day: WorkoutDay,
}

/// Built-in push/pull/legs rotation
pub fn default_schedule() -> &'static WorkoutSchedule {
    &DEFAULT_SCHEDULE
}

fn day(name: &str, workout_type: &str, exercises: &[(&str, &str)]) -> WorkoutDay {
    WorkoutDay {
        day: name.into(),
        workout_type: workout_type.into(),
        exercises: exercises
            .iter()
            .map(|(name, sets)| Exercise::new(*name, *sets))
            .collect(),
    }
}

fn build_default_schedule() -> WorkoutSchedule {
    WorkoutSchedule {
        a: vec![
            day(
                "Monday",
                "Push Day (Chest, Shoulders, Triceps)",
                &[
                    ("Bench Press", "4x5"),
                    ("Overhead Press", "3x8"),
                    ("Incline Dumbbell Press", "3x10"),
                    ("Tricep Pushdowns", "3x12"),
                    ("Lateral Raises", "4x15"),
                ],
            ),
            day(
                "Wednesday",
                "Pull Day (Back, Biceps)",
                &[
                    ("Deadlifts", "3x5"),
                    ("Pull-Ups", "3xAMRAP"),
                    ("Bent-Over Rows", "3x8"),
                    ("Face Pulls", "3x15"),
                    ("Bicep Curls", "3x12"),
                ],
            ),
            day(
                "Friday",
                "Leg Day (Quads, Hamstrings, Calves)",
                &[
                    ("Squats", "4x5"),
                    ("Romanian Deadlifts", "3x8"),
                    ("Leg Press", "3x10"),
                    ("Leg Curls", "3x12"),
                    ("Calf Raises", "4x15"),
                ],
            ),
        ],
        b: vec![
            day(
                "Tuesday",
                "Upper Body Strength",
                &[
                    ("Weighted Pull-Ups", "4x6"),
                    ("Dumbbell Bench Press", "4x8"),
                    ("T-Bar Rows", "3x10"),
                    ("Seated Dumbbell Shoulder Press", "3x10"),
                    ("Skull Crushers", "3x12"),
                ],
            ),
            day(
                "Thursday",
                "Lower Body Hypertrophy",
                &[
                    ("Front Squats", "4x8"),
                    ("Good Mornings", "3x10"),
                    ("Bulgarian Split Squats", "3x12 per leg"),
                    ("Glute Ham Raises", "3x12"),
                    ("Seated Calf Raises", "4x20"),
                ],
            ),
            day(
                "Saturday",
                "Full Body Conditioning",
                &[
                    ("Kettlebell Swings", "5x20"),
                    ("Push Press", "4x8"),
                    ("Box Jumps", "3x10"),
                    ("Farmers Walk", "3x50 meters"),
                    ("Plank", "3x60 seconds"),
                ],
            ),
        ],
    }
}

/// Full English day name as used in schedules
pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Week a weekday trains in, `None` on Sunday
pub fn week_for(weekday: Weekday) -> Option<WeekLabel> {
    match weekday {
        Weekday::Mon | Weekday::Wed | Weekday::Fri => Some(WeekLabel::A),
        Weekday::Tue | Weekday::Thu | Weekday::Sat => Some(WeekLabel::B),
        Weekday::Sun => None,
    }
}

/// Resolve the workout for a weekday
///
/// Sunday, and any weekday the schedule has no entry for, is a rest day.
/// Sunday reports week A.
pub fn plan_for(schedule: &WorkoutSchedule, weekday: Weekday) -> DayPlan {
    let name = day_name(weekday);
    let Some(week) = week_for(weekday) else {
        return DayPlan {
            week: WeekLabel::A,
            day: WorkoutDay::rest(name),
        };
    };

    let day = schedule
        .week(week)
        .iter()
        .find(|d| d.day == name)
        .cloned()
        .unwrap_or_else(|| {
            tracing::debug!("No {} workout in week {}, resting", name, week);
            WorkoutDay::rest(name)
        });

    DayPlan { week, day }
}

/// Whether `day_name`'s workout already has a log dated `today`
pub fn is_logged_today(history: &[WorkoutLog], day_name: &str, today: NaiveDate) -> bool {
    history
        .iter()
        .any(|log| log.date == today && log.day == day_name)
}

/// Dates of every log that includes `exercise_name`, in history order
pub fn exercise_history(history: &[WorkoutLog], exercise_name: &str) -> Vec<NaiveDate> {
    history
        .iter()
        .filter(|log| log.exercises.iter().any(|e| e.name == exercise_name))
        .map(|log| log.date)
        .collect()
}

impl WorkoutSchedule {
    /// Load a custom schedule from a JSON file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let schedule: WorkoutSchedule = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded schedule from {:?} ({} A days, {} B days)",
            path,
            schedule.a.len(),
            schedule.b.len()
        );
        Ok(schedule)
    }

    /// Load from `path` if given, otherwise use the built-in schedule
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(default_schedule().clone()),
        }
    }
}
