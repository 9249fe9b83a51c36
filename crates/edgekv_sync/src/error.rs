//! Error types for store clients and the reconciliation engine.

use std::io;
use thiserror::Error;

/// Result type for store client calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a [`KeyValueStore`](crate::KeyValueStore) implementation.
///
/// During apply, the engine does not branch on the variant: a conflict and a
/// transport failure both fail that one key and the run continues. The
/// distinction is preserved here for diagnostics and for callers that want it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The presented concurrency token no longer matches the store.
    #[error("concurrency token mismatch: presented {presented}, store is at {current}")]
    Conflict {
        /// Token presented with the mutation.
        presented: String,
        /// Token the store currently holds.
        current: String,
    },

    /// Network or client failure talking to the store.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// Another process holds exclusive access to a local store.
    #[error("store locked: another process has exclusive access")]
    Locked,

    /// I/O error from a local store backend.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A local store document could not be decoded.
    #[error("invalid store document: {message}")]
    InvalidDocument {
        /// Description of the problem.
        message: String,
    },
}

impl StoreError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an invalid-document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Returns true for a stale-token conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Result type for reconciliation runs.
pub type SyncResult<T> = Result<T, SyncError>;

/// Fatal errors for a whole reconciliation run.
///
/// Only the lookups ahead of the diff are fatal: without an accurate observed
/// set and initial token the run cannot safely proceed. Per-key apply failures
/// are never errors — they are recorded in the
/// [`SyncReport`](crate::SyncReport) and the run continues.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading the store's concurrency token failed.
    #[error("fetching concurrency token: {0}")]
    TokenFetch(#[source] StoreError),

    /// Listing the store's keys failed.
    #[error("listing store keys: {0}")]
    ListKeys(#[source] StoreError),
}
