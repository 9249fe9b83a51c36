//! # edgekv Sync
//!
//! Reconciliation engine and store client seam for edgekv.
//!
//! This crate provides:
//! - The [`KeyValueStore`] trait: token fetch, paged listing, token-checked
//!   delete and put
//! - [`compute_plan`]: the three-way partition of desired against observed
//!   state
//! - [`Reconciler`]: the apply protocol — deletions then upserts, serial,
//!   each mutation threading the token returned by the previous one
//! - [`MemoryStore`]: an in-memory store with fault injection for tests
//! - [`FileStore`]: a file-backed store with advisory locking
//!
//! ## Key Invariants
//!
//! - No mutation is attempted before the observed set is listed to exhaustion
//! - Every mutation presents the token from the immediately preceding
//!   successful call; at most one mutation is in flight per token value
//! - A per-key failure never aborts a run; only the initial lookups are fatal
//! - All phase traversal is in lexicographic key order

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
mod file_store;
mod memory;
mod plan;
mod report;
mod store;

pub use engine::Reconciler;
pub use error::{StoreError, StoreResult, SyncError, SyncResult};
pub use file_store::{FileStore, DEFAULT_PAGE_SIZE};
pub use memory::{InjectedFault, MemoryStore};
pub use plan::{compute_plan, SyncPlan};
pub use report::{Action, KeyOutcome, SyncReport};
pub use store::{KeyListing, KeyValueStore, StoredEntry, Token};
