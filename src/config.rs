//! Configuration model for the tool.
//!
//! Loaded from a YAML file (`.gemini.yml` by default). The `sets` section
//! declares named groups of test files, `system` carries project-wide
//! settings, and `browsers` declares the browsers suites run in.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::GeminiError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Named groups of test files.
    #[serde(default)]
    pub sets: BTreeMap<String, SetConfig>,
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub browsers: BTreeMap<String, BrowserConfig>,
}

/// One declared set: which files it covers and in which browsers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetConfig {
    /// Paths, directories or glob masks the set is built from.
    #[serde(default)]
    pub files: Vec<String>,
    /// Browsers the set runs in. Defaults to every configured browser.
    pub browsers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Root all relative paths resolve against. Defaults to the directory
    /// containing the config file.
    pub project_root: Option<PathBuf>,
    /// Glob patterns excluded from file resolution.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowserConfig {
    /// Window size as `WIDTHxHEIGHT`, e.g. `1280x1024`.
    pub window_size: Option<String>,
    /// Free-form capabilities forwarded to the browser session.
    #[serde(default)]
    pub capabilities: BTreeMap<String, serde_yaml::Value>,
}

impl Config {
    /// Reads and parses a config file, fixing up `project_root` so that a
    /// missing or relative value resolves against the config's directory.
    pub fn load(path: &Path) -> Result<Self, GeminiError> {
        let source = fs::read_to_string(path).map_err(|e| GeminiError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut config: Config = serde_yaml::from_str(&source).map_err(|e| GeminiError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.system.project_root = Some(match config.system.project_root.take() {
            Some(root) if root.is_absolute() => root,
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        });
        Ok(config)
    }

    /// Root all relative paths resolve against.
    pub fn project_root(&self) -> &Path {
        self.system.project_root.as_deref().unwrap_or_else(|| Path::new("."))
    }

    /// Configured browser identifiers, in stable order.
    pub fn browser_ids(&self) -> Vec<String> {
        self.browsers.keys().cloned().collect()
    }
}
