//! Directory-derived index redirects.

use crate::error::{SourceError, SourceResult};
use edgekv_core::RuleSet;
use std::fs;
use std::path::Path;

/// Walks a site root and returns one index redirect per directory.
///
/// Every directory below the root yields `"/<rel>" → "/<rel>/"`, with
/// URL-style forward slashes regardless of platform. The root itself is
/// excluded.
///
/// # Errors
///
/// Fails when the root is missing, is not a directory, or a subdirectory
/// cannot be read.
pub fn scan_directories(root: &Path) -> SourceResult<RuleSet> {
    let metadata = fs::metadata(root).map_err(|e| SourceError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(SourceError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut rules = RuleSet::new();
    walk(root, "", &mut rules)?;
    Ok(rules)
}

fn walk(dir: &Path, prefix: &str, rules: &mut RuleSet) -> SourceResult<()> {
    for entry in fs::read_dir(dir).map_err(|e| SourceError::io(dir, e))? {
        let entry = entry.map_err(|e| SourceError::io(dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| SourceError::io(&entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }

        let name = entry.file_name();
        let url_path = format!("{prefix}/{}", name.to_string_lossy());
        rules.insert(url_path.clone(), format!("{url_path}/"));
        walk(&entry.path(), &url_path, rules)?;
    }
    Ok(())
}
