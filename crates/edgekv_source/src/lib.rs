//! # edgekv Source
//!
//! Desired-state builders for edgekv.
//!
//! This crate derives the rule sets a site wants stored remotely:
//! - [`scan_directories`]: one `/dir` → `/dir/` redirect per directory under
//!   a site root
//! - [`parse_redirects`]: explicit redirect declarations from
//!   `_redirects.txt`
//! - [`resolve_chains`]: collapse multi-hop redirects to their terminal
//!   destination
//! - [`parse_headers`]: response-header blocks from `_headers.json`
//!
//! Every builder is a pure transformation from files on disk to a
//! [`RuleSet`](edgekv_core::RuleSet); merging and precedence are
//! [`RuleSet::merge`](edgekv_core::RuleSet::merge)'s job, and nothing here
//! talks to a store.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod chains;
mod directories;
mod error;
mod headers;
mod redirects;

pub use chains::resolve_chains;
pub use directories::scan_directories;
pub use error::{SourceError, SourceResult};
pub use headers::{parse_headers, HEADERS_FILE};
pub use redirects::{parse_redirects, REDIRECTS_FILE};
