//! Daily food ledger and calorie balance.
//!
//! Ledger operations are copy-on-write: they take the current entries by
//! reference and return a new collection.

use crate::{FoodEntry, FoodInfo};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Summed calories and macros
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Append an entry with a fresh identity
pub fn add_entry(entries: &[FoodEntry], info: FoodInfo) -> Vec<FoodEntry> {
    let mut next = entries.to_vec();
    let entry = FoodEntry::from_info(info);
    tracing::debug!("Adding food entry {} ({})", entry.id, entry.name);
    next.push(entry);
    next
}

/// Drop the entry with `id`; unknown ids leave the entries unchanged
pub fn remove_entry(entries: &[FoodEntry], id: Uuid) -> Vec<FoodEntry> {
    entries.iter().filter(|e| e.id != id).cloned().collect()
}

pub fn totals(entries: &[FoodEntry]) -> MacroTotals {
    entries.iter().fold(MacroTotals::default(), |acc, e| MacroTotals {
        calories: acc.calories + e.calories,
        protein: acc.protein + e.protein,
        carbs: acc.carbs + e.carbs,
        fat: acc.fat + e.fat,
    })
}

pub fn net_intake(totals: &MacroTotals, calories_burned: f64) -> f64 {
    totals.calories - calories_burned
}

pub fn remaining(target: f64, net: f64) -> f64 {
    target - net
}

/// Percentage of the target consumed, floored at 0 and not capped
pub fn progress_percent(net: f64, target: f64) -> f64 {
    (net / target * 100.0).max(0.0)
}

/// Add exercise calories to the day's total; non-positive amounts are ignored
pub fn record_burn(total: f64, amount: f64) -> f64 {
    if amount > 0.0 {
        total + amount
    } else {
        total
    }
}

/// Everything the calorie view shows for one day
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct DailyBalance {
    pub totals: MacroTotals,
    pub burned: f64,
    pub net: f64,
    pub target: f64,
    pub remaining: f64,
    pub progress_percent: f64,
}

impl DailyBalance {
    pub fn compute(entries: &[FoodEntry], burned: f64, target: f64) -> Self {
        let totals = totals(entries);
        let net = net_intake(&totals, burned);
        Self {
            totals,
            burned,
            net,
            target,
            remaining: remaining(target, net),
            progress_percent: progress_percent(net, target),
        }
    }

    pub fn is_over_target(&self) -> bool {
        self.progress_percent > 100.0
    }
}

// ============================================================================
// Lookup providers
// ============================================================================

/// Source of nutrition facts
///
/// `None` means "not found"; callers report it rather than retrying.
pub trait FoodLookup {
    fn lookup_food(&self, query: &str) -> Option<FoodInfo>;

    fn lookup_food_by_barcode(&self, barcode: &str) -> Option<FoodInfo>;
}

/// Lookup backed by a fixed food table and a barcode-to-product map
#[derive(Clone, Debug, Default)]
pub struct StaticFoodLookup {
    pub foods: Vec<FoodInfo>,
    pub barcodes: HashMap<String, String>,
}

impl StaticFoodLookup {
    pub fn new(foods: Vec<FoodInfo>, barcodes: HashMap<String, String>) -> Self {
        Self { foods, barcodes }
    }
}

impl FoodLookup for StaticFoodLookup {
    fn lookup_food(&self, query: &str) -> Option<FoodInfo> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let found = self
            .foods
            .iter()
            .find(|food| food.name.to_lowercase() == needle)
            .cloned();
        if found.is_none() {
            tracing::debug!("No food matching {:?}", query);
        }
        found
    }

    fn lookup_food_by_barcode(&self, barcode: &str) -> Option<FoodInfo> {
        match self.barcodes.get(barcode.trim()) {
            Some(product) => self.lookup_food(product),
            None => {
                tracing::warn!("Barcode {} not found", barcode);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodInfo {
        FoodInfo {
            name: name.into(),
            calories,
            protein,
            carbs,
            fat,
        }
    }

    fn apple() -> FoodInfo {
        info("1 apple", 95.0, 0.5, 25.0, 0.3)
    }

    #[test]
    fn test_add_entry_does_not_mutate_input() {
        let empty: Vec<FoodEntry> = Vec::new();
        let entries = add_entry(&empty, apple());

        assert!(empty.is_empty());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "1 apple");
    }

    #[test]
    fn test_add_then_remove_restores_entries() {
        let base = add_entry(&[], info("2 eggs", 156.0, 12.6, 1.2, 10.6));
        let added = add_entry(&base, apple());
        let new_id = added.last().unwrap().id;

        assert_eq!(remove_entry(&added, new_id), base);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let entries = add_entry(&[], apple());
        assert_eq!(remove_entry(&entries, Uuid::new_v4()), entries);
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let entries = add_entry(&add_entry(&[], apple()), apple());
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[test]
    fn test_totals() {
        let entries = add_entry(
            &add_entry(&[], apple()),
            info("chicken breast", 165.0, 31.0, 0.0, 3.6),
        );
        let sum = totals(&entries);

        assert_eq!(sum.calories, 260.0);
        assert_eq!(sum.protein, 31.5);
        assert_eq!(sum.carbs, 25.0);
        assert!((sum.fat - 3.9).abs() < 1e-9);
        assert_eq!(totals(&[]), MacroTotals::default());
    }

    #[test]
    fn test_balance_arithmetic() {
        let sum = MacroTotals {
            calories: 1800.0,
            ..Default::default()
        };
        let net = net_intake(&sum, 300.0);

        assert_eq!(net, 1500.0);
        assert_eq!(remaining(2000.0, net), 500.0);
        assert_eq!(progress_percent(net, 2000.0), 75.0);
    }

    #[test]
    fn test_progress_floored_but_not_capped() {
        assert_eq!(progress_percent(-200.0, 2000.0), 0.0);
        assert_eq!(progress_percent(3000.0, 2000.0), 150.0);
    }

    #[test]
    fn test_record_burn_ignores_non_positive() {
        assert_eq!(record_burn(100.0, 250.0), 350.0);
        assert_eq!(record_burn(100.0, 0.0), 100.0);
        assert_eq!(record_burn(100.0, -50.0), 100.0);
    }

    #[test]
    fn test_daily_balance_over_target() {
        let entries = add_entry(&[], info("pizza", 2600.0, 100.0, 300.0, 100.0));
        let balance = DailyBalance::compute(&entries, 100.0, 2000.0);

        assert_eq!(balance.net, 2500.0);
        assert_eq!(balance.remaining, -500.0);
        assert!(balance.is_over_target());
    }

    #[test]
    fn test_static_lookup_by_name_and_barcode() {
        let mut barcodes = HashMap::new();
        barcodes.insert("0123456789012".to_string(), "1 Apple".to_string());
        let lookup = StaticFoodLookup::new(vec![apple()], barcodes);

        assert_eq!(lookup.lookup_food("1 APPLE "), Some(apple()));
        assert_eq!(lookup.lookup_food_by_barcode("0123456789012"), Some(apple()));
        assert_eq!(lookup.lookup_food("durian"), None);
        assert_eq!(lookup.lookup_food_by_barcode("999"), None);
        assert_eq!(lookup.lookup_food("  "), None);
    }
}
