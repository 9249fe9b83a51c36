//! Redirect chain resolution.

use crate::error::{SourceError, SourceResult};
use edgekv_core::RuleSet;
use std::collections::BTreeSet;

/// Collapses redirect chains to their terminal destination.
///
/// If `/a → /b` and `/b → /c`, both keys end up mapping to `/c`; multi-hop
/// chains collapse the same way, so every stored redirect answers in a
/// single hop. A value that is not itself a key is already terminal.
///
/// # Errors
///
/// Returns [`SourceError::RedirectCycle`] when following a value leads back
/// to a key already on the path.
pub fn resolve_chains(rules: &RuleSet) -> SourceResult<RuleSet> {
    let mut resolved = RuleSet::new();

    for (key, value) in rules.iter() {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        seen.insert(key);

        let mut target = value;
        while let Some(next) = rules.get(target) {
            if !seen.insert(target) {
                return Err(SourceError::RedirectCycle {
                    key: key.to_string(),
                });
            }
            target = next;
        }
        resolved.insert(key, target);
    }

    Ok(resolved)
}
