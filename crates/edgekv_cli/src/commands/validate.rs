//! Validate command implementation.

use crate::commands::{print_capacity, print_violations};
use crate::config::Settings;
use crate::desired;
use edgekv_core::{validate, ValidationReport};
use serde::Serialize;
use std::error::Error;

/// Combined validation output for both rule sets.
#[derive(Debug, Serialize)]
struct ValidateResult {
    redirects: ValidationReport,
    headers: ValidationReport,
}

/// Runs the validate command: builds desired state and checks the budgets,
/// without touching any store.
pub fn run(settings: &Settings, format: &str) -> Result<(), Box<dyn Error>> {
    let state = desired::build(settings)?;

    let result = ValidateResult {
        redirects: validate(&state.redirects),
        headers: validate(&state.headers),
    };

    let valid = result.redirects.is_valid() && result.headers.is_valid();
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_violations("redirects", &result.redirects);
        print_violations("headers", &result.headers);
        if valid {
            eprintln!("Validation passed");
            eprintln!("Store capacity:");
            print_capacity("redirects", &result.redirects);
            print_capacity("headers", &result.headers);
        }
    }

    if valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgekv_testkit::SiteFixture;

    fn settings(site: &std::path::Path) -> Settings {
        Settings {
            site: site.to_path_buf(),
            redirects_store: None,
            headers_store: None,
            resolve_chains: true,
        }
    }

    #[test]
    fn valid_site_passes() {
        let site = SiteFixture::new()
            .with_dirs(&["blog"])
            .with_redirects("/old /new\n");
        run(&settings(site.path()), "text").unwrap();
    }

    #[test]
    fn oversized_key_fails() {
        let key = format!("/{}", "k".repeat(600));
        let site = SiteFixture::new().with_redirects(&format!("{key} /dest\n"));
        assert!(run(&settings(site.path()), "text").is_err());
    }

    #[test]
    fn json_format_also_fails_nonzero() {
        let key = format!("/{}", "k".repeat(600));
        let site = SiteFixture::new().with_redirects(&format!("{key} /dest\n"));
        assert!(run(&settings(site.path()), "json").is_err());
    }
}
