//! File-backed store.
//!
//! A store directory holds:
//!
//! ```text
//! <store_path>/
//! ├─ STORE.json   # { "token": u64, "entries": { key: value } }
//! └─ LOCK         # Advisory lock for single-writer
//! ```
//!
//! The LOCK file serializes whole runs across processes: a second opener gets
//! [`StoreError::Locked`] instead of racing token conflicts. Document writes
//! are atomic (write temp, fsync, rename) so an interrupted run leaves the
//! previous generation intact.

use crate::error::{StoreError, StoreResult};
use crate::store::{KeyListing, KeyValueStore, StoredEntry, Token};
use fs2::FileExt;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::ops::Bound;
use std::path::{Path, PathBuf};

const STORE_FILE: &str = "STORE.json";
const STORE_TEMP: &str = "STORE.json.tmp";
const LOCK_FILE: &str = "LOCK";

/// Default number of entries per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 500;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    token: u64,
    entries: BTreeMap<String, String>,
}

/// A [`KeyValueStore`] persisted as a JSON document in a locked directory.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    doc: RwLock<StoreDocument>,
    page_size: usize,
    _lock_file: File,
}

impl FileStore {
    /// Opens or creates a store directory, taking its exclusive lock.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Locked`] when another process holds the lock,
    /// [`StoreError::InvalidDocument`] when `STORE.json` cannot be decoded,
    /// or an I/O error.
    pub fn open(path: &Path) -> StoreResult<Self> {
        fs::create_dir_all(path)?;

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.join(LOCK_FILE))?;
        if lock_file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked);
        }

        let doc_path = path.join(STORE_FILE);
        let doc = if doc_path.exists() {
            let data = fs::read(&doc_path)?;
            serde_json::from_slice(&data)
                .map_err(|e| StoreError::invalid_document(e.to_string()))?
        } else {
            StoreDocument::default()
        };

        Ok(Self {
            path: path.to_path_buf(),
            doc: RwLock::new(doc),
            page_size: DEFAULT_PAGE_SIZE,
            _lock_file: lock_file,
        })
    }

    /// Sets the listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        self.page_size = page_size;
        self
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.doc.read().entries.len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doc.read().entries.is_empty()
    }

    /// Snapshot of the stored entries.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.doc.read().entries.clone()
    }

    /// Persists the document atomically: write temp, fsync, rename.
    fn persist(&self, doc: &StoreDocument) -> StoreResult<()> {
        let temp_path = self.path.join(STORE_TEMP);
        let data = serde_json::to_vec_pretty(doc)
            .map_err(|e| StoreError::invalid_document(e.to_string()))?;

        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, self.path.join(STORE_FILE))?;
        self.sync_directory()?;
        Ok(())
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> StoreResult<()> {
        let dir = File::open(&self.path)?;
        dir.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> StoreResult<()> {
        Ok(())
    }

    fn token_for(generation: u64) -> Token {
        Token::new(generation.to_string())
    }

    fn check_token(doc: &StoreDocument, if_match: &Token) -> StoreResult<()> {
        let current = Self::token_for(doc.token);
        if *if_match != current {
            return Err(StoreError::Conflict {
                presented: if_match.as_str().to_string(),
                current: current.as_str().to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn fetch_token(&self) -> StoreResult<Token> {
        Ok(Self::token_for(self.doc.read().token))
    }

    fn list_keys(&self, continuation: Option<&str>) -> StoreResult<KeyListing> {
        let doc = self.doc.read();
        let range = match continuation {
            Some(cursor) => doc
                .entries
                .range::<str, _>((Bound::Excluded(cursor), Bound::Unbounded)),
            None => doc.entries.range::<str, _>(..),
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
        let mut doc = self.doc.write();
        Self::check_token(&doc, if_match)?;

        doc.entries.remove(key);
        doc.token += 1;
        self.persist(&doc)?;
        Ok(Self::token_for(doc.token))
    }

    fn put_key(&self, key: &str, value: &str, if_match: &Token) -> StoreResult<Token> {
        let mut doc = self.doc.write();
        Self::check_token(&doc, if_match)?;

        doc.entries.insert(key.to_string(), value.to_string());
        doc.token += 1;
        self.persist(&doc)?;
        Ok(Self::token_for(doc.token))
    }
}
