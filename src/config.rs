//! # Tool Configuration
//!
//! Parsing for the `mgit.yaml` configuration file. The configuration is a
//! small key/value mapping; the one required key is `server`, the root URL
//! that every repository's `url` suffix is appended to when building a full
//! clone URL. Optional keys carry workspace-wide defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parsed `mgit.yaml` contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root URL prepended to every repository's url suffix.
    pub server: String,
}

/// Parse a configuration from a YAML string.
pub fn parse(content: &str) -> Result<Config> {
    serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some("mgit.yaml needs at least a 'server:' root URL".to_string()),
    })
}

/// Load and parse a configuration file.
pub fn from_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        message: format!("unable to read {}: {}", path.display(), e),
        hint: Some("pass --config-file to point at your mgit.yaml".to_string()),
    })?;
    parse(&content)
}
