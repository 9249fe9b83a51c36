//! Store client abstraction.
//!
//! This trait is the seam between the reconciliation engine and whatever holds
//! the remote state — a hosted edge store behind a client library, the
//! file-backed store in this workspace, or an in-memory double in tests.
//! Client configuration (region, credentials) belongs to the implementation's
//! constructor, never to ambient process state.

use crate::error::StoreResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque concurrency token for compare-and-swap mutation.
///
/// The token versions the store as a whole, not a single key. Every mutation
/// presents the token it believes is current and receives the successor token
/// on success; at most one mutation may be in flight per token value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Creates a token from its opaque string form.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The opaque string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored key and its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// The key.
    pub key: String,
    /// The stored value.
    pub value: String,
}

/// One page of a key listing.
#[derive(Debug, Clone, Default)]
pub struct KeyListing {
    /// Entries in this page.
    pub entries: Vec<StoredEntry>,
    /// Continuation cursor; `None` when no further pages remain.
    pub next: Option<String>,
}

impl KeyListing {
    /// A terminal page with no continuation.
    #[must_use]
    pub fn last_page(entries: Vec<StoredEntry>) -> Self {
        Self {
            entries,
            next: None,
        }
    }

    /// A page followed by more.
    #[must_use]
    pub fn page(entries: Vec<StoredEntry>, next: impl Into<String>) -> Self {
        Self {
            entries,
            next: Some(next.into()),
        }
    }
}

/// A key-value store mutated under optimistic concurrency control.
///
/// All calls block; the engine issues them strictly sequentially because each
/// mutation's returned token is a required input to the next mutation.
pub trait KeyValueStore: Send + Sync {
    /// Reads the store's current concurrency token (a metadata read).
    fn fetch_token(&self) -> StoreResult<Token>;

    /// Lists one page of stored entries.
    ///
    /// Pass `None` for the first page and the previous page's
    /// [`KeyListing::next`] cursor afterwards. Callers must keep requesting
    /// pages until `next` is `None`; a partial listing is never a valid basis
    /// for diffing.
    fn list_keys(&self, continuation: Option<&str>) -> StoreResult<KeyListing>;

    /// Deletes a key, presenting the current token.
    ///
    /// Returns the successor token on success.
    fn delete_key(&self, key: &str, if_match: &Token) -> StoreResult<Token>;

    /// Adds or updates a key, presenting the current token.
    ///
    /// Returns the successor token on success. Add and update are the same
    /// mechanism; the store does not care whether the key pre-existed.
    fn put_key(&self, key: &str, value: &str, if_match: &Token) -> StoreResult<Token>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = Token::new("etag-42");
        assert_eq!(token.as_str(), "etag-42");
        assert_eq!(token.to_string(), "etag-42");
        assert_eq!(token, Token::new(String::from("etag-42")));
    }

    #[test]
    fn listing_pages() {
        let page = KeyListing::page(vec![], "cursor");
        assert_eq!(page.next.as_deref(), Some("cursor"));

        let last = KeyListing::last_page(vec![]);
        assert!(last.next.is_none());
    }
}
