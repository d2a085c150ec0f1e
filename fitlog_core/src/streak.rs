//! Consecutive-day workout streaks.

use crate::WorkoutLog;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Streaks {
    /// Run ending on the latest logged date if that is today or yesterday,
    /// 0 otherwise
    pub current: u32,
    /// Longest run anywhere in the history
    pub longest: u32,
}

/// Compute streaks relative to the local calendar date
pub fn current_streaks(logs: &[WorkoutLog]) -> Streaks {
    calculate_streaks(logs, Local::now().date_naive())
}

/// Compute streaks relative to `today`
///
/// Several logs on the same date count once. Order of `logs` is irrelevant.
pub fn calculate_streaks(logs: &[WorkoutLog], today: NaiveDate) -> Streaks {
    let dates: BTreeSet<NaiveDate> = logs.iter().map(|log| log.date).collect();
    if dates.is_empty() {
        return Streaks::default();
    }

    let sorted: Vec<NaiveDate> = dates.into_iter().collect();

    let mut longest = 1;
    let mut run = 1;
    for pair in sorted.windows(2) {
        if gap_days(pair[0], pair[1]) == 1 {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }

    // Only a latest date of today or yesterday keeps the streak alive; a
    // latest date after today (clock skew) does not.
    let current = match sorted.last() {
        Some(last) if (0..=1).contains(&gap_days(*last, today)) => {
            let mut count = 1;
            for pair in sorted.windows(2).rev() {
                if gap_days(pair[0], pair[1]) != 1 {
                    break;
                }
                count += 1;
            }
            count
        }
        _ => 0,
    };

    tracing::debug!("Streaks: current={} longest={}", current, longest);

    Streaks { current, longest }
}

fn gap_days(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}
