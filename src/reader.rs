//! Orchestrates test discovery and loading.
//!
//! Flow: validate requested set names, resolve scan paths, delegate to the
//! set builder, then load each resolved file one at a time while emitting
//! lifecycle events, accumulating everything into one suite tree.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::{Config, SetConfig};
use crate::events::{Event, EventEmitter};
use crate::loader;
use crate::sets::{BuildOptions, ResolvedFileSet, SetsBuilder, SetsError};
use crate::suite::Suite;
use crate::tests_api::TestsApi;
use crate::validators;
use crate::GeminiError;

/// Directory scanned when neither sets nor paths are given.
const DEFAULT_DIR: &str = "gemini";

/// Command-line inputs of a read.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Explicit paths to read tests from.
    pub paths: Vec<PathBuf>,
    /// Declared set names selected on the command line.
    pub sets: Option<Vec<String>>,
}

/// Reads every test file selected by `options` and `config` into a suite
/// tree, emitting [`Event::BeforeFileRead`]/[`Event::AfterFileRead`] around
/// each file.
pub async fn read_tests(
    options: &ReadOptions,
    config: &Config,
    emitter: &mut EventEmitter,
) -> Result<Suite, GeminiError> {
    let requested = options.sets.as_deref().unwrap_or_default();
    let known: Vec<&str> = config.sets.keys().map(String::as_str).collect();
    validators::validate_unknown_sets(&known, requested)?;

    let scan_paths = resolve_scan_paths(&config.sets, &options.paths, config.project_root());

    let resolved = SetsBuilder::create(&config.sets, &config.browser_ids())
        .use_sets(requested)
        .use_files(&scan_paths)
        .build(
            config.project_root(),
            BuildOptions {
                ignore: config.system.exclude.clone(),
            },
        )
        .await
        .map_err(normalize_build_error)?;

    load_suites(&resolved, emitter)
}

/// Decides which paths to hand to the set builder.
///
/// Declared sets or explicit paths mean the caller is in charge; only a
/// bare invocation falls back to `<project_root>/gemini`.
fn resolve_scan_paths(
    sets: &BTreeMap<String, SetConfig>,
    cli_paths: &[PathBuf],
    project_root: &Path,
) -> Vec<PathBuf> {
    if !sets.is_empty() || !cli_paths.is_empty() {
        cli_paths.to_vec()
    } else {
        vec![project_root.join(DEFAULT_DIR)]
    }
}

/// Reduces build failures to the tool's two public kinds: the domain kind
/// keeps its message, everything else keeps only its message.
fn normalize_build_error(error: SetsError) -> GeminiError {
    match error {
        SetsError::General(message) => GeminiError::Sets { message },
        other => GeminiError::Other {
            message: other.to_string(),
        },
    }
}

/// Loads every resolved file, strictly in order, one at a time.
fn load_suites(
    resolved: &ResolvedFileSet,
    emitter: &mut EventEmitter,
) -> Result<Suite, GeminiError> {
    let root = Suite::root();
    for (path, browsers) in resolved.iter() {
        // The authoring surface lives exactly as long as this file's load.
        let api = TestsApi::new(Rc::clone(&root), browsers, path);
        emitter.emit(Event::BeforeFileRead, path);
        loader::load_file(path, &api)?;
        emitter.emit(Event::AfterFileRead, path);
    }
    Ok(Rc::try_unwrap(root)
        .map(RefCell::into_inner)
        .unwrap_or_else(|shared| shared.borrow().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(files: &[&str]) -> SetConfig {
        SetConfig {
            files: files.iter().map(|f| f.to_string()).collect(),
            browsers: None,
        }
    }

    #[test]
    fn bare_invocation_falls_back_to_the_default_directory() {
        let paths = resolve_scan_paths(&BTreeMap::new(), &[], Path::new("/project"));
        assert_eq!(paths, vec![PathBuf::from("/project/gemini")]);
    }

    #[test]
    fn cli_paths_are_used_verbatim() {
        let cli = vec![PathBuf::from("custom/dir"), PathBuf::from("/abs/file.yaml")];
        let paths = resolve_scan_paths(&BTreeMap::new(), &cli, Path::new("/project"));
        assert_eq!(paths, cli);

        let mut sets = BTreeMap::new();
        sets.insert("all".to_string(), set(&["gemini"]));
        let paths = resolve_scan_paths(&sets, &cli, Path::new("/project"));
        assert_eq!(paths, cli);
    }

    #[test]
    fn declared_sets_suppress_the_default_directory() {
        let mut sets = BTreeMap::new();
        sets.insert("all".to_string(), set(&["gemini"]));
        let paths = resolve_scan_paths(&sets, &[], Path::new("/project"));
        assert!(paths.is_empty());
    }

    #[test]
    fn domain_build_failures_keep_their_kind_and_message() {
        let err = normalize_build_error(SetsError::General("M".to_string()));
        match err {
            GeminiError::Sets { message } => assert_eq!(message, "M"),
            other => panic!("expected Sets, got {other:?}"),
        }
    }

    #[test]
    fn foreign_build_failures_keep_only_their_message() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "M");
        let err = normalize_build_error(SetsError::Io(io));
        match err {
            GeminiError::Other { message } => assert_eq!(message, "M"),
            other => panic!("expected Other, got {other:?}"),
        }
    }
}
