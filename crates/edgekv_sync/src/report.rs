//! Per-run reconciliation reports.

use serde::Serialize;
use std::fmt;

/// What a mutation did, for reporting.
///
/// Adds and updates are the same store mechanism (an upsert); the distinction
/// exists only so reports can say whether the key pre-existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Upsert of a key the store did not have.
    Add,
    /// Upsert of a pre-existing key with a changed value.
    Update,
    /// Removal of a key absent from the desired set.
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Add => f.write_str("add"),
            Action::Update => f.write_str("update"),
            Action::Delete => f.write_str("delete"),
        }
    }
}

/// Outcome of one attempted mutation.
#[derive(Debug, Clone, Serialize)]
pub struct KeyOutcome {
    /// The key the mutation targeted.
    pub key: String,
    /// What the mutation was.
    pub action: Action,
    /// Failure reason; `None` when the mutation applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KeyOutcome {
    pub(crate) fn applied(key: &str, action: Action) -> Self {
        Self {
            key: key.to_string(),
            action,
            error: None,
        }
    }

    pub(crate) fn failed(key: &str, action: Action, reason: String) -> Self {
        Self {
            key: key.to_string(),
            action,
            error: Some(reason),
        }
    }

    /// Returns true if the mutation applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.error.is_none()
    }
}

/// The result of one reconciliation run.
///
/// Outcomes appear in application order: deletions first, then upserts, each
/// phase in lexicographic key order. The report is plain data — formatting and
/// exit-code policy belong to the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Every attempted mutation, in application order.
    pub outcomes: Vec<KeyOutcome>,
    /// Keys already holding their desired value; no mutation attempted.
    pub unchanged: usize,
}

impl SyncReport {
    /// Number of mutations that applied.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    /// Number of mutations that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.applied()
    }

    /// Number of applied mutations for one action kind.
    #[must_use]
    pub fn applied_for(&self, action: Action) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.action == action && o.is_applied())
            .count()
    }

    /// Number of failed mutations for one action kind.
    #[must_use]
    pub fn failed_for(&self, action: Action) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.action == action && !o.is_applied())
            .count()
    }

    /// Iterates the failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &KeyOutcome> {
        self.outcomes.iter().filter(|o| !o.is_applied())
    }

    /// Returns true if any mutation failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_applied())
    }

    /// Returns true if the run attempted no mutations at all.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_action_and_outcome() {
        let report = SyncReport {
            outcomes: vec![
                KeyOutcome::applied("/a", Action::Delete),
                KeyOutcome::applied("/b", Action::Add),
                KeyOutcome::failed("/c", Action::Update, "token mismatch".into()),
            ],
            unchanged: 2,
        };

        assert_eq!(report.applied(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.applied_for(Action::Delete), 1);
        assert_eq!(report.applied_for(Action::Add), 1);
        assert_eq!(report.failed_for(Action::Update), 1);
        assert_eq!(report.failed_for(Action::Delete), 0);
        assert!(report.has_failures());
        assert!(!report.is_noop());

        let failed_keys: Vec<&str> = report.failures().map(|o| o.key.as_str()).collect();
        assert_eq!(failed_keys, vec!["/c"]);
    }

    #[test]
    fn empty_report_is_noop() {
        let report = SyncReport::default();
        assert!(report.is_noop());
        assert!(!report.has_failures());
        assert_eq!(report.applied(), 0);
    }
}
