//! Builds the desired rule sets from a site tree.

use crate::config::Settings;
use edgekv_core::{MergedRules, ResolvedConflict, RuleSet};
use std::error::Error;
use tracing::{debug, info};

/// Desired state for both stores, ready for validation.
pub struct DesiredState {
    /// Redirect rules: directory-derived entries merged with declarations,
    /// chains collapsed when configured.
    pub redirects: RuleSet,
    /// Header rules from the declaration file.
    pub headers: RuleSet,
    /// Keys where a declaration overrode a directory-derived redirect.
    pub conflicts: Vec<ResolvedConflict>,
}

/// Scans, parses, merges, and (optionally) chain-resolves the site's rules.
pub fn build(settings: &Settings) -> Result<DesiredState, Box<dyn Error>> {
    let dir_rules = edgekv_source::scan_directories(&settings.site)?;
    info!(count = dir_rules.len(), "scanned directory redirects");

    let file_rules = edgekv_source::parse_redirects(&settings.site)?;
    info!(count = file_rules.len(), "parsed declared redirects");

    // Declarations override directory-derived entries.
    let MergedRules { rules, conflicts } = RuleSet::merge(dir_rules, file_rules);
    for conflict in &conflicts {
        debug!(
            key = %conflict.key,
            kept = %conflict.kept,
            discarded = %conflict.discarded,
            "declaration overrides directory redirect"
        );
    }

    let redirects = if settings.resolve_chains {
        edgekv_source::resolve_chains(&rules)?
    } else {
        rules
    };

    let headers = edgekv_source::parse_headers(&settings.site)?;
    info!(count = headers.len(), "parsed header rules");

    Ok(DesiredState {
        redirects,
        headers,
        conflicts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgekv_testkit::SiteFixture;
    use std::path::PathBuf;

    fn settings(site: PathBuf, resolve_chains: bool) -> Settings {
        Settings {
            site,
            redirects_store: None,
            headers_store: None,
            resolve_chains,
        }
    }

    #[test]
    fn merges_declarations_over_directories() {
        let site = SiteFixture::new()
            .with_dirs(&["blog", "about"])
            .with_redirects("/blog /weblog/\n/custom /dest\n");

        let state = build(&settings(site.path().to_path_buf(), true)).unwrap();

        assert_eq!(state.redirects.get("/blog"), Some("/weblog/"));
        assert_eq!(state.redirects.get("/about"), Some("/about/"));
        assert_eq!(state.redirects.get("/custom"), Some("/dest"));
        assert_eq!(state.conflicts.len(), 1);
        assert_eq!(state.conflicts[0].key, "/blog");
    }

    #[test]
    fn chains_collapse_unless_disabled() {
        let site = SiteFixture::new().with_redirects("/a /b\n/b /c\n");

        let resolved = build(&settings(site.path().to_path_buf(), true)).unwrap();
        assert_eq!(resolved.redirects.get("/a"), Some("/c"));

        let raw = build(&settings(site.path().to_path_buf(), false)).unwrap();
        assert_eq!(raw.redirects.get("/a"), Some("/b"));
    }

    #[test]
    fn headers_come_along() {
        let site = SiteFixture::new()
            .with_headers(r#"{"/": {"Cache-Control": "no-store", "X-Frame-Options": "DENY"}}"#);

        let state = build(&settings(site.path().to_path_buf(), true)).unwrap();
        assert_eq!(
            state.headers.get("/"),
            Some("Cache-Control: no-store\nX-Frame-Options: DENY")
        );
    }

    #[test]
    fn redirect_cycle_fails_the_build() {
        let site = SiteFixture::new().with_redirects("/a /b\n/b /a\n");
        assert!(build(&settings(site.path().to_path_buf(), true)).is_err());
    }
}
