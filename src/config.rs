//! Configuration for the HTTP executor and the CLI.
//!
//! Looked up in order: an explicit path, `./sqlreq.toml`, then
//! `<config dir>/sqlreq/config.toml`. Missing files fall back to defaults.
//!
//! ```toml
//! [http]
//! user_agent = "sqlreq/0.1"
//! connect_timeout = 10
//!
//! [http.default_headers]
//! accept = "application/json"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SqlReqError, SqlReqResult};

/// Name of the project-local config file.
pub const CONFIG_FILE: &str = "sqlreq.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: Option<String>,
    /// Seconds.
    pub connect_timeout: Option<u64>,
    /// Sent with every request unless the query sets the same header.
    pub default_headers: BTreeMap<String, String>,
}

impl Config {
    pub fn from_toml_str(content: &str) -> SqlReqResult<Self> {
        toml::from_str(content).map_err(|e| SqlReqError::Config(e.to_string()))
    }

    pub fn from_path(path: &Path) -> SqlReqResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `explicit` if given, otherwise from the first existing
    /// file in [`Config::search_paths`].
    pub fn load(explicit: Option<&Path>) -> SqlReqResult<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        match Self::search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sqlreq").join("config.toml"));
        }
        paths
    }
}
