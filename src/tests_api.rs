//! The authoring surface a test file sees while it loads.

use std::path::{Path, PathBuf};

use crate::loader::SuiteDefinition;
use crate::suite::{SharedSuite, State, Suite};
use crate::GeminiError;

/// Authoring API scoped to a single file load.
///
/// Constructed right before a file is read and dropped right after it has
/// loaded, so it never outlives one file. Every suite it registers lands in
/// the shared root stamped with the file's browsers and origin.
pub struct TestsApi {
    root: SharedSuite,
    browsers: Vec<String>,
    file: PathBuf,
}

impl TestsApi {
    pub fn new(root: SharedSuite, browsers: &[String], file: &Path) -> Self {
        Self {
            root,
            browsers: browsers.to_vec(),
            file: file.to_path_buf(),
        }
    }

    /// Browsers the current file's suites run in.
    pub fn browsers(&self) -> &[String] {
        &self.browsers
    }

    /// Registers a top-level suite (and its children) into the shared tree.
    pub fn suite(&self, name: &str, definition: &SuiteDefinition) -> Result<(), GeminiError> {
        let suite = self.build_suite(name, definition)?;
        let mut root = self.root.borrow_mut();
        if root.has_child(name) {
            return Err(self.invalid(name, "a suite with this name already exists"));
        }
        root.add_child(suite);
        Ok(())
    }

    fn build_suite(&self, name: &str, definition: &SuiteDefinition) -> Result<Suite, GeminiError> {
        if name.trim().is_empty() {
            return Err(self.invalid(name, "suite name must not be empty"));
        }
        let mut suite = Suite::new(name);
        suite.browsers = self.browsers.clone();
        suite.file = Some(self.file.clone());
        suite.url = definition.url.clone();
        suite.capture_selectors = definition.capture.clone();
        suite.skipped = definition.skip;
        suite.states = definition
            .states
            .iter()
            .map(|state| State {
                name: state.name.clone(),
                tolerance: state.tolerance,
            })
            .collect();
        for (child_name, child) in &definition.suites {
            suite.add_child(self.build_suite(child_name, child)?);
        }
        Ok(suite)
    }

    fn invalid(&self, name: &str, reason: &str) -> GeminiError {
        GeminiError::InvalidSuite {
            name: name.to_string(),
            path: self.file.clone(),
            reason: reason.to_string(),
        }
    }
}
