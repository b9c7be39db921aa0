//! Loads test-definition files.
//!
//! Loads are always fresh: every call re-reads the file from disk and
//! registers its suites through the authoring API it was given, so repeated
//! loads observe current on-disk content instead of anything cached.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::tests_api::TestsApi;
use crate::GeminiError;

/// Top-level schema of a test-definition file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileDefinition {
    #[serde(default)]
    pub suites: BTreeMap<String, SuiteDefinition>,
}

/// One suite definition, possibly nested.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteDefinition {
    pub url: Option<String>,
    /// Selectors captured for every state of this suite.
    #[serde(default)]
    pub capture: Vec<String>,
    #[serde(default)]
    pub states: Vec<StateDefinition>,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub suites: BTreeMap<String, SuiteDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateDefinition {
    pub name: String,
    pub tolerance: Option<f64>,
}

/// Reads and parses `path`, registering every suite it defines.
pub fn load_file(path: &Path, api: &TestsApi) -> Result<(), GeminiError> {
    let source = fs::read_to_string(path).map_err(|e| GeminiError::FileRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let definition: FileDefinition =
        serde_yaml::from_str(&source).map_err(|e| GeminiError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    for (name, suite) in &definition.suites {
        api.suite(name, suite)?;
    }
    Ok(())
}
