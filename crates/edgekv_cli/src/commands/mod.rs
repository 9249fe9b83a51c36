//! CLI command implementations.

pub mod deploy;
pub mod validate;

use edgekv_core::{ValidationReport, MAX_TOTAL_BYTES};

/// Prints every violation in a report, prefixed with the rule-set label.
pub(crate) fn print_violations(label: &str, report: &ValidationReport) {
    if report.is_valid() {
        return;
    }
    eprintln!("Validation errors ({label}):");
    for violation in &report.violations {
        eprintln!("  {violation}");
    }
}

/// Prints one capacity line for a validated rule set.
pub(crate) fn print_capacity(label: &str, report: &ValidationReport) {
    eprintln!(
        "  {label}: {} keys, {} / {} bytes ({:.1}%)",
        report.stats.keys,
        report.stats.total_bytes,
        MAX_TOTAL_BYTES,
        report.stats.percent_of_budget()
    );
}
