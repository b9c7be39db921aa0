//! The in-memory suite tree test files register into.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use serde::Serialize;

/// A single captured state of a suite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct State {
    pub name: String,
    /// Comparison tolerance override for this state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
}

/// A node in the suite tree.
///
/// The root is an unnamed container; every other node comes from a test
/// file and carries the browsers of the file it was registered from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Suite {
    pub name: String,
    pub browsers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub capture_selectors: Vec<String>,
    pub skipped: bool,
    pub states: Vec<State>,
    pub children: Vec<Suite>,
    /// File the suite was registered from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Shared handle the authoring API mutates during loads.
pub type SharedSuite = Rc<RefCell<Suite>>;

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Suite {
            name: name.into(),
            ..Suite::default()
        }
    }

    /// The unnamed root every registration hangs off.
    pub fn root() -> SharedSuite {
        Rc::new(RefCell::new(Suite::default()))
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|child| child.name == name)
    }

    pub fn add_child(&mut self, child: Suite) {
        self.children.push(child);
    }

    /// Number of suites in this subtree, the root excluded.
    pub fn suite_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.suite_count())
            .sum()
    }

    /// Number of states in this subtree.
    pub fn state_count(&self) -> usize {
        self.states.len()
            + self
                .children
                .iter()
                .map(Suite::state_count)
                .sum::<usize>()
    }
}
