//! Rule sets: ordered key → value mappings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered mapping from key to value describing desired store state.
///
/// Keys are opaque path-like strings; values are opaque strings (a redirect
/// target or a newline-joined header block). Backed by a [`BTreeMap`] so that
/// every traversal is lexicographic by construction — consumers never depend
/// on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    entries: BTreeMap<String, String>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rule, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates rules in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Merges a base set with an override set.
    ///
    /// For any key present in both, the override's value wins and the pair is
    /// reported as a resolved conflict. Neither input survives; the merged set
    /// owns all entries.
    #[must_use]
    pub fn merge(base: RuleSet, overrides: RuleSet) -> MergedRules {
        let mut entries = base.entries;
        let mut conflicts = Vec::new();

        for (key, value) in overrides.entries {
            if let Some(discarded) = entries.insert(key.clone(), value.clone()) {
                conflicts.push(ResolvedConflict {
                    key,
                    discarded,
                    kept: value,
                });
            }
        }

        MergedRules {
            rules: RuleSet { entries },
            conflicts,
        }
    }

    /// Borrows the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Consumes the set, returning the underlying map.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.entries
    }
}

impl From<BTreeMap<String, String>> for RuleSet {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, String)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The result of merging two rule sets.
#[derive(Debug, Clone)]
pub struct MergedRules {
    /// The merged rule set.
    pub rules: RuleSet,
    /// Keys present in both inputs, resolved in favor of the override.
    pub conflicts: Vec<ResolvedConflict>,
}

/// A key present in both merge inputs, resolved in favor of the override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConflict {
    /// The contested key.
    pub key: String,
    /// The base value that lost.
    pub discarded: String,
    /// The override value that won.
    pub kept: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(pairs: &[(&str, &str)]) -> RuleSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn insert_and_get() {
        let mut set = RuleSet::new();
        assert!(set.is_empty());

        set.insert("/blog", "/blog/");
        assert_eq!(set.get("/blog"), Some("/blog/"));
        assert_eq!(set.len(), 1);

        let previous = set.insert("/blog", "/weblog/");
        assert_eq!(previous.as_deref(), Some("/blog/"));
        assert_eq!(set.get("/blog"), Some("/weblog/"));
    }

    #[test]
    fn iteration_is_lexicographic() {
        let set = rules(&[("/z", "1"), ("/a", "2"), ("/m", "3")]);
        let keys: Vec<&str> = set.keys().collect();
        assert_eq!(keys, vec!["/a", "/m", "/z"]);
    }

    #[test]
    fn merge_override_wins() {
        let base = rules(&[("/blog", "/blog/"), ("/about", "/about/")]);
        let overrides = rules(&[("/blog", "/new-blog/"), ("/custom", "/redirect/")]);

        let merged = RuleSet::merge(base, overrides);
        assert_eq!(merged.rules.len(), 3);
        assert_eq!(merged.rules.get("/blog"), Some("/new-blog/"));
        assert_eq!(merged.rules.get("/about"), Some("/about/"));
        assert_eq!(merged.rules.get("/custom"), Some("/redirect/"));

        assert_eq!(merged.conflicts.len(), 1);
        let conflict = &merged.conflicts[0];
        assert_eq!(conflict.key, "/blog");
        assert_eq!(conflict.discarded, "/blog/");
        assert_eq!(conflict.kept, "/new-blog/");
    }

    #[test]
    fn merge_reports_identical_value_collisions() {
        let base = rules(&[("/blog", "/blog/")]);
        let overrides = rules(&[("/blog", "/blog/")]);

        let merged = RuleSet::merge(base, overrides);
        assert_eq!(merged.rules.len(), 1);
        assert_eq!(merged.conflicts.len(), 1);
        assert_eq!(merged.conflicts[0].key, "/blog");
    }

    #[test]
    fn merge_empty() {
        let merged = RuleSet::merge(RuleSet::new(), RuleSet::new());
        assert!(merged.rules.is_empty());
        assert!(merged.conflicts.is_empty());
    }
}
