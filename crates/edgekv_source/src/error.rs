//! Error types for desired-state builders.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for desired-state builders.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised while deriving desired state from a site tree.
#[derive(Debug, Error)]
pub enum SourceError {
    /// I/O failure reading the site tree or a declaration file.
    #[error("{path}: {source}")]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The site root exists but is not a directory.
    #[error("{path}: not a directory")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// The headers declaration file could not be decoded.
    #[error("{path}: invalid headers document: {message}")]
    InvalidHeaders {
        /// The declaration file path.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// Redirects form a loop with no terminal destination.
    #[error("redirect cycle involving {key}")]
    RedirectCycle {
        /// A key on the cycle.
        key: String,
    },
}

impl SourceError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
