//! # edgekv Core
//!
//! Rule-set data model and size-budget validation for edgekv.
//!
//! This crate provides:
//! - [`RuleSet`]: an ordered key → value mapping describing desired store state
//! - Merge with defined precedence and resolved-conflict reporting
//! - Size-budget validation against the store's fixed ceilings
//! - Capacity statistics for reporting
//!
//! ## Key Invariants
//!
//! - Rule-set keys are unique; traversal is always lexicographic
//! - Validation is a pure gate: no I/O, no mutation, all violations collected
//! - Budgets are store-imposed constants, never adjustable by the caller

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod rules;
mod validate;

pub use rules::{MergedRules, ResolvedConflict, RuleSet};
pub use validate::{
    validate, CapacityStats, ValidationReport, Violation, MAX_ENTRY_BYTES, MAX_KEY_BYTES,
    MAX_TOTAL_BYTES,
};
