#![forbid(unsafe_code)]

//! Core domain model and analytics for the Fitlog tracker.
//!
//! This crate provides:
//! - Domain types (schedules, workout logs, settings, food entries)
//! - Set-scheme parsing and the workout logging session builder
//! - Streak, weekly volume and calorie goal calculations
//! - The daily nutrition ledger and food lookup providers
//! - Persistence (JSONL store, profile, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod set_scheme;
pub mod session;
pub mod streak;
pub mod weekly;
pub mod calories;
pub mod nutrition;
pub mod schedule;
pub mod lock;
pub mod store;
pub mod profile;
pub mod history;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use set_scheme::{parse_set_scheme, SetScheme};
pub use session::{build_draft, finalize, finalize_on, Draft, SetField};
pub use streak::{calculate_streaks, current_streaks, Streaks};
pub use weekly::{week_start, weekly_summaries, WeeklySummary};
pub use calories::{calculate_goals, CalorieGoals, GoalTargets};
pub use nutrition::{DailyBalance, FoodLookup, MacroTotals, StaticFoodLookup};
pub use schedule::{default_schedule, plan_for, DayPlan};
pub use store::{FoodStore, JsonlStore, WorkoutStore};
pub use profile::Profile;
pub use history::load_history;
