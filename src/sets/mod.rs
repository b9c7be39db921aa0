//! Set resolution: maps declared test sets and path overrides to the
//! concrete files each browser runs against.
//!
//! This layer owns mask expansion and exclusion; callers treat the result
//! as an opaque, iterable collection of `(path, browsers)` pairs.

mod patterns;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::config::SetConfig;
use self::patterns::{compile, is_glob, to_slash, ExcludeMatcher};

/// Failure kinds of the set-resolution layer.
#[derive(Debug, Error)]
pub enum SetsError {
    /// The layer's own failure kind for anything resolution-related.
    #[error("{0}")]
    General(String),
    /// Filesystem failures, surfaced with their original rendering.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Options for [`SetsBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Glob patterns dropped from every expansion, relative to the root.
    pub ignore: Vec<String>,
}

/// Extensions recognized when a mask expands to a directory scan.
const TEST_FILE_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

#[derive(Debug, Clone)]
struct SetDefinition {
    name: Option<String>,
    files: Vec<String>,
    browsers: Vec<String>,
}

/// Resolves declared sets plus path overrides into concrete files.
#[derive(Debug, Clone)]
pub struct SetsBuilder {
    sets: Vec<SetDefinition>,
    known_browsers: Vec<String>,
    files: Vec<PathBuf>,
}

impl SetsBuilder {
    /// Snapshots the declared sets. With no sets declared, a single
    /// anonymous set covering every configured browser is synthesized; a
    /// set without explicit browsers also covers every configured browser.
    pub fn create(sets: &BTreeMap<String, SetConfig>, browser_ids: &[String]) -> Self {
        let definitions = if sets.is_empty() {
            vec![SetDefinition {
                name: None,
                files: Vec::new(),
                browsers: browser_ids.to_vec(),
            }]
        } else {
            sets.iter()
                .map(|(name, set)| SetDefinition {
                    name: Some(name.clone()),
                    files: set.files.clone(),
                    browsers: set
                        .browsers
                        .clone()
                        .unwrap_or_else(|| browser_ids.to_vec()),
                })
                .collect()
        };
        Self {
            sets: definitions,
            known_browsers: browser_ids.to_vec(),
            files: Vec::new(),
        }
    }

    /// Restricts the build to the named sets. An empty selection keeps all.
    pub fn use_sets(mut self, names: &[String]) -> Self {
        if !names.is_empty() {
            self.sets.retain(|set| {
                set.name
                    .as_deref()
                    .is_some_and(|name| names.iter().any(|n| n == name))
            });
        }
        self
    }

    /// Overrides or narrows the files the sets expand to: sets without
    /// declared files expand these paths instead; sets with declared files
    /// keep only matches under one of these paths.
    pub fn use_files(mut self, paths: &[PathBuf]) -> Self {
        self.files = paths.to_vec();
        self
    }

    /// Expands every set against the filesystem under `project_root`.
    pub async fn build(
        self,
        project_root: &Path,
        options: BuildOptions,
    ) -> Result<ResolvedFileSet, SetsError> {
        let exclude = ExcludeMatcher::new(&options.ignore)?;
        let overrides: Vec<PathBuf> = self
            .files
            .iter()
            .map(|path| absolutize(path, project_root))
            .collect();

        let mut groups: BTreeMap<PathBuf, BTreeSet<String>> = BTreeMap::new();
        for set in &self.sets {
            check_browsers(set, &self.known_browsers)?;

            let mut files = Vec::new();
            if set.files.is_empty() {
                for path in &overrides {
                    files.extend(expand_path(path, project_root, &exclude).await?);
                }
            } else {
                for mask in &set.files {
                    files.extend(expand_mask(mask, project_root, &exclude).await?);
                }
                if !overrides.is_empty() {
                    files.retain(|file| {
                        overrides.iter().any(|o| file == o || file.starts_with(o))
                    });
                }
            }

            files.sort();
            files.dedup();
            for file in files {
                groups
                    .entry(file)
                    .or_default()
                    .extend(set.browsers.iter().cloned());
            }
        }

        Ok(ResolvedFileSet::from_groups(groups))
    }
}

/// Concrete `(file, browsers)` pairs produced by a build, in a stable
/// sorted order with the browser union per file.
#[derive(Debug, Clone, Default)]
pub struct ResolvedFileSet {
    groups: BTreeMap<PathBuf, Vec<String>>,
}

impl ResolvedFileSet {
    fn from_groups(groups: BTreeMap<PathBuf, BTreeSet<String>>) -> Self {
        Self {
            groups: groups
                .into_iter()
                .map(|(path, browsers)| (path, browsers.into_iter().collect()))
                .collect(),
        }
    }

    /// Builds a set directly from `(path, browsers)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (PathBuf, Vec<String>)>,
    {
        Self {
            groups: pairs.into_iter().collect(),
        }
    }

    /// Iterates the resolved files with their browsers.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[String])> {
        self.groups
            .iter()
            .map(|(path, browsers)| (path.as_path(), browsers.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn absolutize(path: &Path, project_root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

fn check_browsers(set: &SetDefinition, known: &[String]) -> Result<(), SetsError> {
    for browser in &set.browsers {
        if !known.contains(browser) {
            return Err(SetsError::General(format!(
                "Unknown browser id: {} in set {} (configured: {})",
                browser,
                set.name.as_deref().unwrap_or("(default)"),
                known.join(", ")
            )));
        }
    }
    Ok(())
}

async fn expand_mask(
    mask: &str,
    project_root: &Path,
    exclude: &ExcludeMatcher,
) -> Result<Vec<PathBuf>, SetsError> {
    if is_glob(mask) {
        expand_glob(mask, project_root, exclude)
    } else {
        let path = absolutize(Path::new(mask), project_root);
        expand_path(&path, project_root, exclude).await
    }
}

/// Expands one plain path: directories are scanned recursively for test
/// files, files are taken as-is, anything unreadable fails the build.
async fn expand_path(
    path: &Path,
    project_root: &Path,
    exclude: &ExcludeMatcher,
) -> Result<Vec<PathBuf>, SetsError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|_| {
        SetsError::General(format!(
            "Cannot read such file or directory: {}",
            path.display()
        ))
    })?;
    if metadata.is_dir() {
        scan_dir(path, project_root, exclude)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}

fn scan_dir(
    dir: &Path,
    project_root: &Path,
    exclude: &ExcludeMatcher,
) -> Result<Vec<PathBuf>, SetsError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| SetsError::Io(e.into()))?;
        if !entry.file_type().is_file() || !is_test_file(entry.path()) {
            continue;
        }
        let rel = entry.path().strip_prefix(project_root).unwrap_or(entry.path());
        if exclude.is_excluded(rel) {
            continue;
        }
        files.push(entry.path().to_path_buf());
    }
    Ok(files)
}

fn expand_glob(
    mask: &str,
    project_root: &Path,
    exclude: &ExcludeMatcher,
) -> Result<Vec<PathBuf>, SetsError> {
    let pattern = compile(mask.trim_start_matches("./"))?;
    let mut files = Vec::new();
    for entry in WalkDir::new(project_root).sort_by_file_name() {
        let entry = entry.map_err(|e| SetsError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(project_root) else {
            continue;
        };
        if exclude.is_excluded(rel) {
            continue;
        }
        if pattern.is_match(&to_slash(rel)) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

fn is_test_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEST_FILE_EXTENSIONS.contains(&ext))
}
