//! Core domain types for the Fitlog system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Schedule definitions (exercises, workout days, A/B weeks)
//! - Logged workouts and their sets
//! - User biometrics and goals
//! - Food entries and nutrition info

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

// ============================================================================
// Schedule Types
// ============================================================================

/// Which half of the two-week rotation a workout belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeekLabel {
    A,
    B,
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekLabel::A => write!(f, "A"),
            WeekLabel::B => write!(f, "B"),
        }
    }
}

/// A prescribed exercise (e.g., "Bench Press", "4x5")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    /// Free-form prescription such as `4x5`, `3xAMRAP` or `3x12 per leg`
    pub sets: String,
}

impl Exercise {
    pub fn new(name: impl Into<String>, sets: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: sets.into(),
        }
    }
}

/// One training day in the schedule
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDay {
    pub day: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub exercises: Vec<Exercise>,
}

impl WorkoutDay {
    /// A day with nothing to log
    pub fn rest(day: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            workout_type: "Rest".into(),
            exercises: Vec::new(),
        }
    }

    pub fn is_rest(&self) -> bool {
        self.exercises.is_empty()
    }
}

/// The complete two-week rotation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSchedule {
    #[serde(rename = "A")]
    pub a: Vec<WorkoutDay>,
    #[serde(rename = "B")]
    pub b: Vec<WorkoutDay>,
}

impl WorkoutSchedule {
    /// Days for the given week
    pub fn week(&self, week: WeekLabel) -> &[WorkoutDay] {
        match week {
            WeekLabel::A => &self.a,
            WeekLabel::B => &self.b,
        }
    }
}

// ============================================================================
// Logged Workout Types
// ============================================================================

/// A single performed set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct CompletedSet {
    pub reps: u32,
    pub weight: f64,
}

impl CompletedSet {
    /// Training load of this set (reps x weight)
    pub fn volume(&self) -> f64 {
        f64::from(self.reps) * self.weight
    }
}

/// An exercise as performed, matched to the schedule by exact name
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletedExercise {
    pub name: String,
    pub sets: Vec<CompletedSet>,
}

/// A recorded workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub date: NaiveDate,
    pub week: WeekLabel,
    pub day: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub exercises: Vec<CompletedExercise>,
}

// ============================================================================
// User Settings
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Daily activity level used to scale BMR into TDEE
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Loss,
    Maintenance,
    Gain,
}

impl Goal {
    pub fn label(self) -> &'static str {
        match self {
            Goal::Loss => "Weight Loss",
            Goal::Maintenance => "Maintenance",
            Goal::Gain => "Weight Gain",
        }
    }
}

/// User biometrics (imperial units) and goal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserSettings {
    pub age: u32,
    pub gender: Gender,
    /// Body weight in pounds
    pub weight: f64,
    /// Height in inches
    pub height: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            age: 30,
            gender: Gender::Male,
            weight: 155.0,
            height: 69.0,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Maintenance,
        }
    }
}

/// A single-field change to [`UserSettings`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SettingsUpdate {
    Age(u32),
    Gender(Gender),
    Weight(f64),
    Height(f64),
    ActivityLevel(ActivityLevel),
    Goal(Goal),
}

impl UserSettings {
    /// Return a copy with one field replaced
    pub fn with(&self, update: SettingsUpdate) -> Self {
        let mut next = self.clone();
        match update {
            SettingsUpdate::Age(age) => next.age = age,
            SettingsUpdate::Gender(gender) => next.gender = gender,
            SettingsUpdate::Weight(weight) => next.weight = weight,
            SettingsUpdate::Height(height) => next.height = height,
            SettingsUpdate::ActivityLevel(level) => next.activity_level = level,
            SettingsUpdate::Goal(goal) => next.goal = goal,
        }
        next
    }
}

// ============================================================================
// Nutrition Types
// ============================================================================

/// Nutrition facts for a food, as returned by a lookup provider
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodInfo {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A food logged for the day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodEntry {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl FoodEntry {
    pub fn from_info(info: FoodInfo) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: info.name,
            calories: info.calories,
            protein: info.protein,
            carbs: info.carbs,
            fat: info.fat,
        }
    }
}

// ============================================================================
// Parsing from user input
// ============================================================================

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(Error::Parse(format!("unknown gender: {}", other))),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" => Ok(ActivityLevel::VeryActive),
            other => Err(Error::Parse(format!("unknown activity level: {}", other))),
        }
    }
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "loss" => Ok(Goal::Loss),
            "maintenance" | "maintain" => Ok(Goal::Maintenance),
            "gain" => Ok(Goal::Gain),
            other => Err(Error::Parse(format!("unknown goal: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workout_log_serializes_date_only() {
        let log = WorkoutLog {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            week: WeekLabel::A,
            day: "Monday".into(),
            workout_type: "Push".into(),
            exercises: vec![],
        };

        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("\"date\":\"2024-03-04\""));
        assert!(json.contains("\"week\":\"A\""));
        assert!(json.contains("\"type\":\"Push\""));
    }

    #[test]
    fn test_settings_update_replaces_single_field() {
        let base = UserSettings::default();
        let updated = base.with(SettingsUpdate::Weight(180.0));

        assert_eq!(updated.weight, 180.0);
        assert_eq!(updated.age, base.age);
        assert_eq!(updated.goal, base.goal);
        assert_eq!(base.weight, 155.0);
    }

    #[test]
    fn test_activity_level_parsing() {
        assert_eq!(
            "very-active".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::VeryActive
        );
        assert_eq!(
            "Moderate".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::Moderate
        );
        assert!("couch".parse::<ActivityLevel>().is_err());
    }

    #[test]
    fn test_activity_multipliers_increase() {
        let multipliers: Vec<f64> = ActivityLevel::ALL.iter().map(|l| l.multiplier()).collect();
        assert!(multipliers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_settings_json_uses_snake_case() {
        let json = serde_json::to_string(&UserSettings::default()).unwrap();
        assert!(json.contains("\"activity_level\":\"moderate\""));
        assert!(json.contains("\"gender\":\"male\""));
    }
}
