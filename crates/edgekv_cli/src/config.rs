//! Deploy configuration.
//!
//! An optional JSON config file supplies defaults; CLI flags override file
//! values. No ambient process state (environment, implicit lookup paths) is
//! ever consulted.

use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "edgekv.json";

/// On-disk configuration. Every field is optional; flags fill the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Site root to derive desired state from.
    pub site: Option<PathBuf>,
    /// Directory of the redirects store.
    pub redirects_store: Option<PathBuf>,
    /// Directory of the headers store.
    pub headers_store: Option<PathBuf>,
    /// Whether to collapse redirect chains. Defaults to true.
    pub resolve_chains: Option<bool>,
}

impl ConfigFile {
    /// Loads a config file.
    ///
    /// An explicitly given path must exist; the default path is used only
    /// when present.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                return Err(format!("config file not found: {}", path.display()).into());
            }
            return Ok(Self::default());
        }

        let data = fs::read_to_string(&path)?;
        let config = serde_json::from_str(&data)
            .map_err(|e| format!("invalid config file {}: {e}", path.display()))?;
        Ok(config)
    }
}

/// Effective settings after merging the config file with CLI flags.
#[derive(Debug)]
pub struct Settings {
    /// Site root to derive desired state from.
    pub site: PathBuf,
    /// Directory of the redirects store, when deploying.
    pub redirects_store: Option<PathBuf>,
    /// Directory of the headers store, when deploying.
    pub headers_store: Option<PathBuf>,
    /// Whether to collapse redirect chains.
    pub resolve_chains: bool,
}

impl Settings {
    /// Merges file values with flag overrides. Flags win.
    pub fn resolve(
        file: ConfigFile,
        site: Option<PathBuf>,
        redirects_store: Option<PathBuf>,
        headers_store: Option<PathBuf>,
    ) -> Result<Self, Box<dyn Error>> {
        let site = site
            .or(file.site)
            .ok_or("site is required (set in config file or via --site)")?;

        Ok(Self {
            site,
            redirects_store: redirects_store.or(file.redirects_store),
            headers_store: headers_store.or(file.headers_store),
            resolve_chains: file.resolve_chains.unwrap_or(true),
        })
    }
}
