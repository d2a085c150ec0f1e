//! Calorie targets from user biometrics.
//!
//! BMR uses the Mifflin-St Jeor equation on metric values converted from
//! the imperial settings. TDEE scales BMR by the activity multiplier and is
//! rounded to whole calories; the goal targets are fixed offsets from it.

use crate::{Gender, Goal, UserSettings};
use serde::Serialize;

pub const KG_PER_LB: f64 = 0.453592;
pub const CM_PER_INCH: f64 = 2.54;

/// Daily offset applied for loss and gain goals
pub const GOAL_OFFSET_KCAL: i64 = 500;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct GoalTargets {
    pub loss: i64,
    pub maintenance: i64,
    pub gain: i64,
}

impl GoalTargets {
    pub fn target_for(&self, goal: Goal) -> i64 {
        match goal {
            Goal::Loss => self.loss,
            Goal::Maintenance => self.maintenance,
            Goal::Gain => self.gain,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct CalorieGoals {
    /// Unrounded basal metabolic rate (kcal/day)
    pub bmr: f64,
    pub tdee: i64,
    pub goals: GoalTargets,
}

/// Mifflin-St Jeor basal metabolic rate
pub fn basal_metabolic_rate(settings: &UserSettings) -> f64 {
    let kg = settings.weight * KG_PER_LB;
    let cm = settings.height * CM_PER_INCH;
    let base = 10.0 * kg + 6.25 * cm - 5.0 * f64::from(settings.age);
    match settings.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Compute BMR, TDEE and the loss/maintenance/gain targets
///
/// Settings are not validated; degenerate values give meaningless numbers.
pub fn calculate_goals(settings: &UserSettings) -> CalorieGoals {
    let bmr = basal_metabolic_rate(settings);
    let tdee = (bmr * settings.activity_level.multiplier()).round() as i64;

    CalorieGoals {
        bmr,
        tdee,
        goals: GoalTargets {
            loss: tdee - GOAL_OFFSET_KCAL,
            maintenance: tdee,
            gain: tdee + GOAL_OFFSET_KCAL,
        },
    }
}
