//! Redirect declaration file parsing.

use crate::error::{SourceError, SourceResult};
use edgekv_core::RuleSet;
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// Name of the redirect declaration file inside a site root.
pub const REDIRECTS_FILE: &str = "_redirects.txt";

/// Parses the site's redirect declaration file.
///
/// Lines are whitespace-delimited columns `source destination [extra…]`;
/// columns past the second are ignored. Blank lines and `#` comments are
/// skipped. A line with fewer than two columns is skipped with a warning,
/// never fatal. A missing file yields an empty set.
///
/// # Errors
///
/// Fails only when the file exists but cannot be read.
pub fn parse_redirects(site_root: &Path) -> SourceResult<RuleSet> {
    let path = site_root.join(REDIRECTS_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RuleSet::new()),
        Err(e) => return Err(SourceError::io(&path, e)),
    };

    let mut rules = RuleSet::new();
    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut columns = line.split_whitespace();
        match (columns.next(), columns.next()) {
            (Some(source), Some(destination)) => {
                rules.insert(source, destination);
            }
            _ => warn!(line = index + 1, content = line, "skipping malformed redirect"),
        }
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_redirects(dir: &Path, content: &str) {
        fs::write(dir.join(REDIRECTS_FILE), content).unwrap();
    }

    #[test]
    fn parses_two_column_lines() {
        let temp = tempdir().unwrap();
        write_redirects(
            temp.path(),
            "/old-page /new-page\n\
             /blog/old /blog/new 301\n\
             # This is a comment\n\
             \n\
             /with-spaces   /destination\n",
        );

        let rules = parse_redirects(temp.path()).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules.get("/old-page"), Some("/new-page"));
        assert_eq!(rules.get("/blog/old"), Some("/blog/new"));
        assert_eq!(rules.get("/with-spaces"), Some("/destination"));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let temp = tempdir().unwrap();
        write_redirects(temp.path(), "/only-source\n/good /dest\n");

        let rules = parse_redirects(temp.path()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get("/good"), Some("/dest"));
    }

    #[test]
    fn missing_file_yields_empty_set() {
        let temp = tempdir().unwrap();
        let rules = parse_redirects(temp.path()).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn empty_file_yields_empty_set() {
        let temp = tempdir().unwrap();
        write_redirects(temp.path(), "");
        let rules = parse_redirects(temp.path()).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn later_duplicate_wins() {
        let temp = tempdir().unwrap();
        write_redirects(temp.path(), "/a /first\n/a /second\n");

        let rules = parse_redirects(temp.path()).unwrap();
        assert_eq!(rules.get("/a"), Some("/second"));
    }
}
