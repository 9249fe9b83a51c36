//! Three-way partition of desired against observed state.

use edgekv_core::RuleSet;
use std::collections::BTreeMap;

/// The minimal set of mutations needed to converge the store.
///
/// The three key vectors are pairwise disjoint and lexicographically sorted;
/// together with the `unchanged` keys they cover the union of observed and
/// desired keys. Keys present on both sides with equal values produce no
/// mutation, so an immediate second run yields an empty plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Desired keys absent from the store.
    pub to_add: Vec<String>,
    /// Keys present on both sides whose stored value differs.
    pub to_update: Vec<String>,
    /// Stored keys absent from the desired set.
    pub to_delete: Vec<String>,
    /// Keys present on both sides with equal values; skipped.
    pub unchanged: usize,
}

impl SyncPlan {
    /// Returns true if no mutation is needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Total number of mutations the plan will issue.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.to_add.len() + self.to_update.len() + self.to_delete.len()
    }
}

/// Partitions keys by set difference between desired and observed state.
///
/// Both inputs iterate in key order, so the plan vectors come out sorted
/// without a separate sort pass.
#[must_use]
pub fn compute_plan(desired: &RuleSet, observed: &BTreeMap<String, String>) -> SyncPlan {
    let mut plan = SyncPlan::default();

    for (key, value) in desired.iter() {
        match observed.get(key) {
            None => plan.to_add.push(key.to_string()),
            Some(stored) if stored != value => plan.to_update.push(key.to_string()),
            Some(_) => plan.unchanged += 1,
        }
    }

    for key in observed.keys() {
        if !desired.contains_key(key) {
            plan.to_delete.push(key.clone());
        }
    }

    plan
}
