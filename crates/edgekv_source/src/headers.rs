//! Header declaration file parsing.

use crate::error::{SourceError, SourceResult};
use edgekv_core::RuleSet;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Name of the header declaration file inside a site root.
pub const HEADERS_FILE: &str = "_headers.json";

/// Parses the site's header declaration file.
///
/// The document maps a URL path to an object of header name → header value.
/// Each path's block is flattened into one newline-joined `"Name: Value"`
/// string, sorted by header name so the flattened value is deterministic.
/// A missing file yields an empty set.
///
/// # Errors
///
/// Fails when the file exists but cannot be read, or when it is not a valid
/// document of the expected shape.
pub fn parse_headers(site_root: &Path) -> SourceResult<RuleSet> {
    let path = site_root.join(HEADERS_FILE);
    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RuleSet::new()),
        Err(e) => return Err(SourceError::io(&path, e)),
    };

    // BTreeMap keeps header names sorted, which fixes the flattened order.
    let raw: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_slice(&data)
        .map_err(|e| SourceError::InvalidHeaders {
            path: path.clone(),
            message: e.to_string(),
        })?;

    let mut rules = RuleSet::new();
    for (url_path, headers) in raw {
        let block: Vec<String> = headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        rules.insert(url_path, block.join("\n"));
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_headers(dir: &Path, content: &str) {
        fs::write(dir.join(HEADERS_FILE), content).unwrap();
    }

    #[test]
    fn flattens_blocks_sorted_by_name() {
        let temp = tempdir().unwrap();
        write_headers(
            temp.path(),
            r#"{
                "/downloads/": {
                    "X-Robots-Tag": "noindex",
                    "Cache-Control": "max-age=3600"
                },
                "/": { "X-Frame-Options": "DENY" }
            }"#,
        );

        let rules = parse_headers(temp.path()).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.get("/"), Some("X-Frame-Options: DENY"));
        assert_eq!(
            rules.get("/downloads/"),
            Some("Cache-Control: max-age=3600\nX-Robots-Tag: noindex")
        );
    }

    #[test]
    fn missing_file_yields_empty_set() {
        let temp = tempdir().unwrap();
        let rules = parse_headers(temp.path()).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn empty_document_yields_empty_set() {
        let temp = tempdir().unwrap();
        write_headers(temp.path(), "{}");
        let rules = parse_headers(temp.path()).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn malformed_document_is_fatal() {
        let temp = tempdir().unwrap();
        write_headers(temp.path(), "{not json");

        let result = parse_headers(temp.path());
        assert!(matches!(result, Err(SourceError::InvalidHeaders { .. })));
    }

    #[test]
    fn wrong_shape_is_fatal() {
        let temp = tempdir().unwrap();
        write_headers(temp.path(), r#"{"/path": "not an object"}"#);

        let result = parse_headers(temp.path());
        assert!(matches!(result, Err(SourceError::InvalidHeaders { .. })));
    }
}
