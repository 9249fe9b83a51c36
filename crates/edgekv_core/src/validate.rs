//! Size-budget validation.
//!
//! The remote store imposes fixed ceilings on key size, per-entry size, and
//! cumulative size. Validation is a hard gate: reconciliation must not be
//! attempted while any violation is present.

use crate::rules::RuleSet;
use serde::Serialize;
use thiserror::Error;

/// Maximum key size in bytes (UTF-8 encoded).
pub const MAX_KEY_BYTES: usize = 512;
/// Maximum key + value size per entry in bytes.
pub const MAX_ENTRY_BYTES: usize = 1024;
/// Maximum cumulative size across all entries in bytes (5 MiB).
pub const MAX_TOTAL_BYTES: usize = 5_242_880;

/// A single budget violation.
///
/// All entries are checked against all budgets; violations never
/// short-circuit, so one oversized entry cannot mask another.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind")]
pub enum Violation {
    /// A key exceeds [`MAX_KEY_BYTES`].
    #[error("{key}: key exceeds {MAX_KEY_BYTES} bytes ({key_bytes} bytes)")]
    KeyTooLarge {
        /// The offending key.
        key: String,
        /// Measured key size in bytes.
        key_bytes: usize,
    },

    /// A key + value pair exceeds [`MAX_ENTRY_BYTES`].
    #[error("{key}: key+value exceeds {MAX_ENTRY_BYTES} bytes ({entry_bytes} bytes)")]
    EntryTooLarge {
        /// The offending key.
        key: String,
        /// Measured key + value size in bytes.
        entry_bytes: usize,
    },

    /// The summed entry sizes exceed [`MAX_TOTAL_BYTES`].
    #[error("total data exceeds {MAX_TOTAL_BYTES} bytes ({total_bytes} bytes)")]
    TotalTooLarge {
        /// Measured cumulative size in bytes.
        total_bytes: usize,
    },
}

/// Capacity usage of a rule set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CapacityStats {
    /// Number of rules.
    pub keys: usize,
    /// Summed key + value bytes.
    pub total_bytes: usize,
}

impl CapacityStats {
    /// Fraction of the total-size budget in use, as a percentage.
    #[must_use]
    pub fn percent_of_budget(&self) -> f64 {
        self.total_bytes as f64 / MAX_TOTAL_BYTES as f64 * 100.0
    }
}

/// Outcome of validating a rule set against the store budgets.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Capacity usage, measured whether or not validation passed.
    pub stats: CapacityStats,
    /// Every violation found, in key order; empty when the set is valid.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns true if no budget was violated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Checks every rule against all store budgets.
///
/// Pure: no I/O, no mutation. All violations are collected — a set with one
/// oversized key and a different oversized entry reports both.
#[must_use]
pub fn validate(rules: &RuleSet) -> ValidationReport {
    let mut violations = Vec::new();
    let mut total_bytes = 0usize;

    for (key, value) in rules.iter() {
        let key_bytes = key.len();
        let entry_bytes = key_bytes + value.len();

        if key_bytes > MAX_KEY_BYTES {
            violations.push(Violation::KeyTooLarge {
                key: key.to_string(),
                key_bytes,
            });
        }

        if entry_bytes > MAX_ENTRY_BYTES {
            violations.push(Violation::EntryTooLarge {
                key: key.to_string(),
                entry_bytes,
            });
        }

        total_bytes += entry_bytes;
    }

    if total_bytes > MAX_TOTAL_BYTES {
        violations.push(Violation::TotalTooLarge { total_bytes });
    }

    ValidationReport {
        stats: CapacityStats {
            keys: rules.len(),
            total_bytes,
        },
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rules(pairs: &[(&str, &str)]) -> RuleSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn valid_set_passes_with_stats() {
        let set = rules(&[("/blog", "/blog/"), ("/about", "/about/")]);
        let report = validate(&set);

        assert!(report.is_valid());
        assert_eq!(report.stats.keys, 2);
        assert_eq!(report.stats.total_bytes, "/blog/blog/".len() + "/about/about/".len());
    }

    #[test]
    fn oversized_key_reported() {
        let long_key = format!("/{}", "k".repeat(MAX_KEY_BYTES));
        let set = rules(&[(long_key.as_str(), "/dest/")]);

        let report = validate(&set);
        assert_eq!(report.violations.len(), 1);
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::KeyTooLarge { key, key_bytes }
                if key == &long_key && *key_bytes == long_key.len())));
    }

    #[test]
    fn oversized_entry_reported() {
        let value = "v".repeat(MAX_ENTRY_BYTES);
        let set = rules(&[("/k", value.as_str())]);

        let report = validate(&set);
        assert_eq!(report.violations.len(), 1);
        assert!(matches!(
            &report.violations[0],
            Violation::EntryTooLarge { key, entry_bytes }
                if key == "/k" && *entry_bytes == 2 + MAX_ENTRY_BYTES
        ));
    }

    #[test]
    fn all_violations_collected() {
        // One record breaks the key budget, a different one the entry budget.
        let long_key = "k".repeat(MAX_KEY_BYTES + 1);
        let long_value = "v".repeat(MAX_ENTRY_BYTES);
        let set = rules(&[(long_key.as_str(), ""), ("/other", long_value.as_str())]);

        let report = validate(&set);
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::KeyTooLarge { key, .. } if key == &long_key)));
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::EntryTooLarge { key, .. } if key == "/other")));
    }

    #[test]
    fn total_budget_boundary() {
        // 5120 entries of exactly 1024 bytes sum to exactly the 5 MiB budget.
        let entry_size = 1024usize;
        assert_eq!(MAX_TOTAL_BYTES % entry_size, 0);

        let mut set = RuleSet::new();
        for i in 0..MAX_TOTAL_BYTES / entry_size {
            let key = format!("/{i:08}");
            let value = "v".repeat(entry_size - key.len());
            set.insert(key, value);
        }

        let report = validate(&set);
        assert_eq!(report.stats.total_bytes, MAX_TOTAL_BYTES);
        assert!(report.is_valid());

        // A one-byte entry (single-byte key, empty value) tips it over by one,
        // violating only the total budget.
        set.insert("x", "");
        let report = validate(&set);
        assert_eq!(report.stats.total_bytes, MAX_TOTAL_BYTES + 1);
        assert_eq!(
            report.violations,
            vec![Violation::TotalTooLarge {
                total_bytes: MAX_TOTAL_BYTES + 1
            }]
        );
    }

    #[test]
    fn key_size_is_bytes_not_chars() {
        // 256 two-byte characters: 256 chars, 512 bytes — exactly at the budget.
        let key: String = "é".repeat(256);
        assert_eq!(key.len(), 512);
        let set = rules(&[(key.as_str(), "")]);
        assert!(validate(&set).is_valid());

        let key: String = "é".repeat(257);
        let set = rules(&[(key.as_str(), "")]);
        assert!(!validate(&set).is_valid());
    }

    proptest! {
        #[test]
        fn within_budget_sets_always_pass(
            pairs in prop::collection::btree_map("/[a-z]{1,40}", "[a-z/]{0,200}", 0..50)
        ) {
            let set: RuleSet = pairs.into_iter().collect();
            let report = validate(&set);
            prop_assert!(report.is_valid());
            prop_assert_eq!(report.stats.keys, set.len());
        }

        #[test]
        fn oversized_keys_always_flagged(suffix in "[a-z]{1,32}") {
            let key = format!("/{}{}", "x".repeat(MAX_KEY_BYTES), suffix);
            let mut set = RuleSet::new();
            set.insert(key, "");
            let report = validate(&set);
            let flagged = report
                .violations
                .iter()
                .any(|v| matches!(v, Violation::KeyTooLarge { .. }));
            prop_assert!(flagged);
        }
    }
}
