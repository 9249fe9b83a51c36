//! Deploy command implementation.

use crate::commands::{print_capacity, print_violations};
use crate::config::Settings;
use crate::desired::{self, DesiredState};
use edgekv_core::{validate, RuleSet};
use edgekv_sync::{FileStore, Reconciler, SyncReport};
use std::error::Error;
use std::path::Path;

/// Runs the deploy command.
///
/// Builds desired state, validates it (a hard gate), and reconciles the
/// redirects store then the headers store. Exits nonzero on validation
/// failure, on a fatal lookup error, or when any key failed to apply; keys
/// applied before a failure stay applied.
pub fn run(settings: &Settings, dry_run: bool, format: &str) -> Result<(), Box<dyn Error>> {
    let state = desired::build(settings)?;

    let redirect_report = validate(&state.redirects);
    let header_report = validate(&state.headers);
    print_violations("redirects", &redirect_report);
    print_violations("headers", &header_report);
    if !redirect_report.is_valid() || !header_report.is_valid() {
        return Err("validation failed".into());
    }

    eprintln!("Validation passed");
    eprintln!("Store capacity:");
    print_capacity("redirects", &redirect_report);
    print_capacity("headers", &header_report);

    if dry_run {
        print_plan(&state);
        eprintln!("Dry run complete. No changes made.");
        return Ok(());
    }

    let redirects_store = settings.redirects_store.as_deref().ok_or(
        "redirects store is required (set in config file or via --redirects-store)",
    )?;
    let headers_store = settings.headers_store.as_deref().ok_or(
        "headers store is required (set in config file or via --headers-store)",
    )?;

    let mut failures = false;
    failures |= sync_store("redirects", redirects_store, &state.redirects, format)?;
    failures |= sync_store("headers", headers_store, &state.headers, format)?;

    if failures {
        return Err("some keys failed to apply".into());
    }
    eprintln!("Deploy complete.");
    Ok(())
}

/// Reconciles one store and prints its report.
///
/// Returns true when any key failed to apply.
fn sync_store(
    label: &str,
    path: &Path,
    desired: &RuleSet,
    format: &str,
) -> Result<bool, Box<dyn Error>> {
    eprintln!("Syncing {label} store at {}", path.display());
    let store = FileStore::open(path)?;
    let engine = Reconciler::new(store);
    let report = engine.reconcile(desired)?;
    print_report(label, &report, format)?;
    Ok(report.has_failures())
}

fn print_report(label: &str, report: &SyncReport, format: &str) -> Result<(), Box<dyn Error>> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    use edgekv_sync::Action;
    println!(
        "{label}: {} added, {} updated, {} deleted, {} unchanged",
        report.applied_for(Action::Add),
        report.applied_for(Action::Update),
        report.applied_for(Action::Delete),
        report.unchanged,
    );
    for outcome in report.failures() {
        println!(
            "  failed {} {}: {}",
            outcome.action,
            outcome.key,
            outcome.error.as_deref().unwrap_or("unknown"),
        );
    }
    Ok(())
}

fn print_plan(state: &DesiredState) {
    println!("=== Redirects ===");
    for (key, value) in state.redirects.iter() {
        println!("{key} -> {value}");
    }
    println!();
    println!("=== Headers ===");
    for (key, value) in state.headers.iter() {
        println!("{key}:\n{value}\n---");
    }
}
