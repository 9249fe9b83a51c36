//! The reconciliation engine.

use crate::error::{SyncError, SyncResult};
use crate::plan::{compute_plan, SyncPlan};
use crate::report::{Action, KeyOutcome, SyncReport};
use crate::store::{KeyValueStore, Token};
use edgekv_core::RuleSet;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Converges a store to a desired rule set with the minimal mutation set.
///
/// One reconciliation run is a single logical thread of control: the store's
/// concurrency token returned by each successful mutation is a required input
/// to the next, so writes are inherently serial. Independent concurrent runs
/// are not coordinated here — an external writer surfaces as per-key
/// conflicts, and callers needing mutual exclusion across runs must serialize
/// them externally.
///
/// Interrupted runs leave already-applied mutations in place; there is no
/// rollback. Re-running to completion converges.
pub struct Reconciler<S> {
    store: S,
}

impl<S: KeyValueStore> Reconciler<S> {
    /// Creates a reconciler over a store client.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Converges the store to `desired`.
    ///
    /// Callers must have validated `desired` against the store budgets first;
    /// the engine assumes the gate already passed.
    ///
    /// Deletions apply before upserts — a defined, reproducible order, not a
    /// correctness requirement (the phases touch disjoint keys). Within each
    /// phase keys apply in lexicographic order. A per-key failure (conflict or
    /// transport alike) is recorded and the run continues with the last
    /// known-good token; only the initial token fetch and the key listing are
    /// fatal.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the token fetch or any listing page fails.
    pub fn reconcile(&self, desired: &RuleSet) -> SyncResult<SyncReport> {
        let mut token = self
            .store
            .fetch_token()
            .map_err(SyncError::TokenFetch)?;

        let observed = self.fetch_observed()?;
        let plan = compute_plan(desired, &observed);
        info!(
            adds = plan.to_add.len(),
            updates = plan.to_update.len(),
            deletes = plan.to_delete.len(),
            unchanged = plan.unchanged,
            "computed sync plan"
        );

        let mut report = SyncReport {
            outcomes: Vec::with_capacity(plan.mutation_count()),
            unchanged: plan.unchanged,
        };

        self.apply_deletes(&plan, &mut token, &mut report);
        self.apply_upserts(desired, &plan, &mut token, &mut report);

        info!(
            applied = report.applied(),
            failed = report.failed(),
            "reconciliation finished"
        );
        Ok(report)
    }

    /// Fetches the complete observed state, driving pagination to exhaustion.
    ///
    /// A partial listing is never used for diffing: any page failure aborts
    /// the run before any mutation is attempted.
    fn fetch_observed(&self) -> SyncResult<BTreeMap<String, String>> {
        let mut observed = BTreeMap::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .store
                .list_keys(continuation.as_deref())
                .map_err(SyncError::ListKeys)?;
            for entry in page.entries {
                observed.insert(entry.key, entry.value);
            }
            match page.next {
                Some(next) => continuation = Some(next),
                None => break,
            }
        }

        debug!(keys = observed.len(), "fetched observed state");
        Ok(observed)
    }

    fn apply_deletes(&self, plan: &SyncPlan, token: &mut Token, report: &mut SyncReport) {
        for key in &plan.to_delete {
            match self.store.delete_key(key, token) {
                Ok(next) => {
                    debug!(key, "deleted");
                    *token = next;
                    report.outcomes.push(KeyOutcome::applied(key, Action::Delete));
                }
                Err(err) => {
                    warn!(key, error = %err, "delete failed");
                    report
                        .outcomes
                        .push(KeyOutcome::failed(key, Action::Delete, err.to_string()));
                }
            }
        }
    }

    fn apply_upserts(
        &self,
        desired: &RuleSet,
        plan: &SyncPlan,
        token: &mut Token,
        report: &mut SyncReport,
    ) {
        // Adds and updates form one phase; merge the two sorted vectors so the
        // phase stays in lexicographic key order.
        let mut upserts: Vec<(&String, Action)> = Vec::with_capacity(
            plan.to_add.len() + plan.to_update.len(),
        );
        upserts.extend(plan.to_add.iter().map(|k| (k, Action::Add)));
        upserts.extend(plan.to_update.iter().map(|k| (k, Action::Update)));
        upserts.sort_by(|a, b| a.0.cmp(b.0));

        for (key, action) in upserts {
            let value = match desired.get(key) {
                Some(value) => value,
                // Plan keys come from `desired`; absence cannot happen.
                None => continue,
            };
            match self.store.put_key(key, value, token) {
                Ok(next) => {
                    debug!(key, %action, "upserted");
                    *token = next;
                    report.outcomes.push(KeyOutcome::applied(key, action));
                }
                Err(err) => {
                    warn!(key, %action, error = %err, "upsert failed");
                    report
                        .outcomes
                        .push(KeyOutcome::failed(key, action, err.to_string()));
                }
            }
        }
    }
}
