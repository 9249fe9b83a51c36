//! Test fixtures: temporary site trees and pre-seeded stores.

use edgekv_core::RuleSet;
use edgekv_source::{HEADERS_FILE, REDIRECTS_FILE};
use edgekv_sync::MemoryStore;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A temporary site tree with automatic cleanup.
///
/// Builder-style: start empty and add directories, pages, and declaration
/// files as the test needs.
///
/// # Example
///
/// ```rust,ignore
/// use edgekv_testkit::SiteFixture;
///
/// let site = SiteFixture::new()
///     .with_dirs(&["blog", "blog/2024"])
///     .with_redirects("/old /new\n");
/// let rules = edgekv_source::scan_directories(site.path()).unwrap();
/// ```
pub struct SiteFixture {
    dir: TempDir,
}

impl SiteFixture {
    /// Creates an empty site root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp site root"),
        }
    }

    /// Creates the given directories (slash-separated, nested allowed).
    #[must_use]
    pub fn with_dirs(self, paths: &[&str]) -> Self {
        for path in paths {
            fs::create_dir_all(self.dir.path().join(path)).expect("failed to create site dir");
        }
        self
    }

    /// Writes an empty page file at the given relative path.
    #[must_use]
    pub fn with_page(self, path: &str) -> Self {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create page parent dir");
        }
        fs::write(full, "").expect("failed to write page");
        self
    }

    /// Writes the redirect declaration file.
    #[must_use]
    pub fn with_redirects(self, content: &str) -> Self {
        fs::write(self.dir.path().join(REDIRECTS_FILE), content)
            .expect("failed to write redirects file");
        self
    }

    /// Writes the header declaration file.
    #[must_use]
    pub fn with_headers(self, content: &str) -> Self {
        fs::write(self.dir.path().join(HEADERS_FILE), content)
            .expect("failed to write headers file");
        self
    }

    /// The site root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for SiteFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a rule set from string pairs.
#[must_use]
pub fn rule_set(pairs: &[(&str, &str)]) -> RuleSet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Creates a memory store pre-seeded with the given entries.
#[must_use]
pub fn seeded_store(pairs: &[(&str, &str)]) -> MemoryStore {
    let store = MemoryStore::new();
    for (key, value) in pairs {
        store.seed(*key, *value);
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgekv_source::{parse_headers, parse_redirects, scan_directories};
    use edgekv_sync::Reconciler;

    #[test]
    fn fixture_drives_the_builders() {
        let site = SiteFixture::new()
            .with_dirs(&["blog", "blog/2024"])
            .with_page("blog/post.html")
            .with_redirects("/old /new\n")
            .with_headers(r#"{"/": {"X-Frame-Options": "DENY"}}"#);

        let dirs = scan_directories(site.path()).unwrap();
        assert_eq!(dirs.len(), 2);

        let redirects = parse_redirects(site.path()).unwrap();
        assert_eq!(redirects.get("/old"), Some("/new"));

        let headers = parse_headers(site.path()).unwrap();
        assert_eq!(headers.get("/"), Some("X-Frame-Options: DENY"));
    }

    #[test]
    fn seeded_store_reconciles() {
        let store = seeded_store(&[("/stale", "x")]);
        let engine = Reconciler::new(store);

        let report = engine.reconcile(&rule_set(&[("/fresh", "y")])).unwrap();
        assert_eq!(report.applied(), 2);
    }
}
