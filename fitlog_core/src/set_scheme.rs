//! Set-scheme parsing.
//!
//! Turns a free-form prescription such as `4x5`, `3xAMRAP` or
//! `3x12 per leg` into a set count and an optional rep target.
//! Parsing never fails: unrecognized prescriptions fall back to
//! [`SetScheme::DEFAULT`].

use serde::{Deserialize, Serialize};

/// Sets used for AMRAP prescriptions without a usable leading count
pub const DEFAULT_AMRAP_SETS: u32 = 3;

/// Largest set count a prescription may ask for
///
/// Larger counts are treated as unrecognized, so a draft never allocates
/// more than this many sets per exercise.
pub const MAX_SETS: u32 = 20;

/// Parsed prescription
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetScheme {
    /// Number of sets. `0` means the set count could not be read.
    pub num_sets: u32,
    /// Target reps per set. `None` means "as many as possible".
    pub num_reps: Option<u32>,
}

impl SetScheme {
    /// Fallback for prescriptions with no recognizable pattern
    pub const DEFAULT: SetScheme = SetScheme {
        num_sets: 3,
        num_reps: Some(10),
    };

    pub fn is_amrap(&self) -> bool {
        self.num_reps.is_none()
    }
}

/// Parse a prescription string
///
/// Rules, applied case-insensitively:
/// 1. Anything containing `amrap` uses the leading integer as the set count
///    (3 if missing, zero or above [`MAX_SETS`]) and has no rep target.
/// 2. `<sets>x<reps>` where the rep part is a plain integer.
///    An unreadable set part yields a set count of 0.
/// 3. Everything else, including rep parts with a unit suffix such as
///    `3x50 meters` and set counts above [`MAX_SETS`], falls back to 3 x 10.
pub fn parse_set_scheme(spec: &str) -> SetScheme {
    let lower = spec.to_lowercase();

    if lower.contains("amrap") {
        let num_sets = match leading_integer(&lower) {
            Some(n) if (1..=MAX_SETS).contains(&n) => n,
            _ => DEFAULT_AMRAP_SETS,
        };
        return SetScheme {
            num_sets,
            num_reps: None,
        };
    }

    let parts: Vec<&str> = lower.split('x').collect();
    if let [sets, reps] = parts.as_slice() {
        if let Some(num_reps) = plain_integer(reps) {
            let has_digits = sets.trim_start().starts_with(|c: char| c.is_ascii_digit());
            match leading_integer(sets) {
                Some(num_sets) if num_sets <= MAX_SETS => {
                    return SetScheme {
                        num_sets,
                        num_reps: Some(num_reps),
                    };
                }
                None if !has_digits => {
                    tracing::debug!("Unreadable set count in {:?}", spec);
                    return SetScheme {
                        num_sets: 0,
                        num_reps: Some(num_reps),
                    };
                }
                _ => tracing::warn!("Set count in {:?} exceeds {}, using default", spec, MAX_SETS),
            }
        }
    }

    tracing::debug!("Unrecognized set scheme {:?}, using default", spec);
    SetScheme::DEFAULT
}

/// Digits at the start of `s` (after leading whitespace)
pub(crate) fn leading_integer(s: &str) -> Option<u32> {
    let trimmed = s.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

fn plain_integer(s: &str) -> Option<u32> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}
