//! Property-based test generators using proptest.
//!
//! Strategies produce path-like keys and rule sets that stay inside the
//! store's size budgets, so properties can assume a valid input unless a
//! test deliberately oversizes it.

use edgekv_core::RuleSet;
use proptest::prelude::*;

/// Strategy for path-like keys: one to three slash-separated segments.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z0-9-]{1,16}", 1..=3)
        .prop_map(|segments| format!("/{}", segments.join("/")))
}

/// Strategy for redirect-target style values.
pub fn value_strategy() -> impl Strategy<Value = String> {
    key_strategy().prop_map(|path| format!("{path}/"))
}

/// Strategy for rule sets of up to `max_rules` entries, all within budget.
pub fn rule_set_strategy(max_rules: usize) -> impl Strategy<Value = RuleSet> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..=max_rules)
        .prop_map(RuleSet::from)
}
