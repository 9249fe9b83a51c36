//! In-memory store for tests and examples.

use crate::error::{StoreError, StoreResult};
use crate::store::{KeyListing, KeyValueStore, StoredEntry, Token};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;

/// A fault to inject into a single mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFault {
    /// Reject the call as a stale-token conflict.
    Conflict,
    /// Reject the call as a transport failure.
    Transport,
}

#[derive(Default)]
struct Inner {
    entries: BTreeMap<String, String>,
    generation: u64,
    put_faults: BTreeMap<String, InjectedFault>,
    delete_faults: BTreeMap<String, InjectedFault>,
    fail_next_listing: bool,
}

/// An in-memory [`KeyValueStore`] with token enforcement.
///
/// Every mutation must present the store's current token and receives the
/// successor token, exactly like the real store — an engine that fails to
/// thread tokens correctly fails against this store too. Faults can be
/// injected per key (one-shot) to exercise partial-failure paths, and the
/// page size can be shrunk to exercise listing pagination.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    page_size: usize,
}

impl MemoryStore {
    /// Creates an empty store serving listings as a single page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            page_size: usize::MAX,
        }
    }

    /// Sets the listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        self.page_size = page_size;
        self
    }

    /// Inserts an entry directly, without token ceremony or generation bump.
    pub fn seed(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.write().entries.insert(key.into(), value.into());
    }

    /// Snapshot of the stored entries.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.inner.read().entries.clone()
    }

    /// Number of successful mutations so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Makes the next `put_key` for `key` fail once with the given fault.
    pub fn inject_put_fault(&self, key: impl Into<String>, fault: InjectedFault) {
        self.inner.write().put_faults.insert(key.into(), fault);
    }

    /// Makes the next `delete_key` for `key` fail once with the given fault.
    pub fn inject_delete_fault(&self, key: impl Into<String>, fault: InjectedFault) {
        self.inner.write().delete_faults.insert(key.into(), fault);
    }

    /// Makes the next listing page request fail once.
    pub fn fail_next_listing(&self) {
        self.inner.write().fail_next_listing = true;
    }

    fn token_for(generation: u64) -> Token {
        Token::new(format!("etag-{generation}"))
    }

    fn check_token(inner: &Inner, if_match: &Token) -> StoreResult<()> {
        let current = Self::token_for(inner.generation);
        if *if_match != current {
            return Err(StoreError::Conflict {
                presented: if_match.as_str().to_string(),
                current: current.as_str().to_string(),
            });
        }
        Ok(())
    }

    fn fault_error(fault: InjectedFault, current: &Token) -> StoreError {
        match fault {
            InjectedFault::Conflict => StoreError::Conflict {
                presented: "injected-stale".into(),
                current: current.as_str().to_string(),
            },
            InjectedFault::Transport => StoreError::transport("injected transport failure"),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn fetch_token(&self) -> StoreResult<Token> {
        Ok(Self::token_for(self.inner.read().generation))
    }

    fn list_keys(&self, continuation: Option<&str>) -> StoreResult<KeyListing> {
        let mut inner = self.inner.write();
        if inner.fail_next_listing {
            inner.fail_next_listing = false;
            return Err(StoreError::transport("injected listing failure"));
        }

        let range = match continuation {
            Some(cursor) => inner
                .entries
                .range::<str, _>((Bound::Excluded(cursor), Bound::Unbounded)),
            None => inner.entries.range::<str, _>(..),
        };

        let entries: Vec<StoredEntry> = range
            .take(self.page_size)
            .map(|(key, value)| StoredEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();

        let next = match entries.last() {
            Some(last) if entries.len() == self.page_size => Some(last.key.clone()),
            _ => None,
        };

        Ok(KeyListing { entries, next })
    }

    fn delete_key(&self, key: &str, if_match: &Token) -> StoreResult<Token> {
        let mut inner = self.inner.write();
        if let Some(fault) = inner.delete_faults.remove(key) {
            let current = Self::token_for(inner.generation);
            return Err(Self::fault_error(fault, &current));
        }
        Self::check_token(&inner, if_match)?;

        inner.entries.remove(key);
        inner.generation += 1;
        Ok(Self::token_for(inner.generation))
    }

    fn put_key(&self, key: &str, value: &str, if_match: &Token) -> StoreResult<Token> {
        let mut inner = self.inner.write();
        if let Some(fault) = inner.put_faults.remove(key) {
            let current = Self::token_for(inner.generation);
            return Err(Self::fault_error(fault, &current));
        }
        Self::check_token(&inner, if_match)?;

        inner.entries.insert(key.to_string(), value.to_string());
        inner.generation += 1;
        Ok(Self::token_for(inner.generation))
    }
}
