//! End-to-end behavior of test discovery and loading.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;

use gemini::config::{BrowserConfig, Config, SetConfig, SystemConfig};
use gemini::events::{Event, EventEmitter};
use gemini::reader::{read_tests, ReadOptions};
use gemini::GeminiError;

fn browsers(ids: &[&str]) -> BTreeMap<String, BrowserConfig> {
    ids.iter()
        .map(|id| (id.to_string(), BrowserConfig::default()))
        .collect()
}

fn config_for(root: &Path, ids: &[&str]) -> Config {
    Config {
        sets: BTreeMap::new(),
        system: SystemConfig {
            project_root: Some(root.to_path_buf()),
            exclude: Vec::new(),
        },
        browsers: browsers(ids),
    }
}

fn set(files: &[&str], set_browsers: Option<&[&str]>) -> SetConfig {
    SetConfig {
        files: files.iter().map(|f| f.to_string()).collect(),
        browsers: set_browsers.map(|ids| ids.iter().map(|id| id.to_string()).collect()),
    }
}

/// Writes a minimal suite definition file and returns its path.
fn write_suite(root: &Path, file: &str, suite: &str) -> PathBuf {
    let path = root.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(
        &path,
        format!(
            "suites:\n  {suite}:\n    url: /{suite}\n    capture: [\".{suite}\"]\n    states:\n      - name: plain\n"
        ),
    )
    .unwrap();
    path
}

/// Records every fired event as `(label, path)` for order assertions.
fn recording_emitter() -> (EventEmitter, Rc<RefCell<Vec<(&'static str, PathBuf)>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut emitter = EventEmitter::new();
    let before = Rc::clone(&log);
    emitter.on(Event::BeforeFileRead, move |path| {
        before.borrow_mut().push(("before", path.to_path_buf()));
    });
    let after = Rc::clone(&log);
    emitter.on(Event::AfterFileRead, move |path| {
        after.borrow_mut().push(("after", path.to_path_buf()));
    });
    (emitter, log)
}

#[tokio::test]
async fn bare_invocation_reads_the_default_directory() {
    let dir = TempDir::new().unwrap();
    write_suite(dir.path(), "gemini/button.yaml", "button");
    let config = config_for(dir.path(), &["chrome", "firefox"]);

    let mut emitter = EventEmitter::new();
    let root = read_tests(&ReadOptions::default(), &config, &mut emitter)
        .await
        .unwrap();

    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].name, "button");
    assert_eq!(root.children[0].browsers, vec!["chrome", "firefox"]);
}

#[tokio::test]
async fn explicit_paths_narrow_declared_sets() {
    let dir = TempDir::new().unwrap();
    let kept = write_suite(dir.path(), "suites/kept.yaml", "kept");
    write_suite(dir.path(), "suites/dropped.yaml", "dropped");

    let mut config = config_for(dir.path(), &["chrome"]);
    config.sets.insert("all".to_string(), set(&["suites"], None));

    let options = ReadOptions {
        paths: vec![kept],
        sets: None,
    };
    let mut emitter = EventEmitter::new();
    let root = read_tests(&options, &config, &mut emitter).await.unwrap();

    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].name, "kept");
}

#[tokio::test]
async fn events_fire_in_order_around_each_file() {
    let dir = TempDir::new().unwrap();
    let a = write_suite(dir.path(), "gemini/a.yaml", "alpha");
    let b = write_suite(dir.path(), "gemini/b.yaml", "beta");
    let config = config_for(dir.path(), &["chrome"]);

    let (mut emitter, log) = recording_emitter();
    let root = read_tests(&ReadOptions::default(), &config, &mut emitter)
        .await
        .unwrap();

    assert_eq!(root.children.len(), 2);
    assert_eq!(
        *log.borrow(),
        vec![
            ("before", a.clone()),
            ("after", a),
            ("before", b.clone()),
            ("after", b),
        ]
    );
}

#[tokio::test]
async fn suites_are_stamped_with_their_files_browsers() {
    let dir = TempDir::new().unwrap();
    write_suite(dir.path(), "one/a.yaml", "alpha");
    write_suite(dir.path(), "two/b.yaml", "beta");

    let mut config = config_for(dir.path(), &["chrome", "firefox"]);
    config
        .sets
        .insert("one".to_string(), set(&["one"], Some(&["chrome"])));
    config
        .sets
        .insert("two".to_string(), set(&["two"], Some(&["firefox"])));

    let mut emitter = EventEmitter::new();
    let root = read_tests(&ReadOptions::default(), &config, &mut emitter)
        .await
        .unwrap();

    let alpha = root.children.iter().find(|s| s.name == "alpha").unwrap();
    let beta = root.children.iter().find(|s| s.name == "beta").unwrap();
    assert_eq!(alpha.browsers, vec!["chrome"]);
    assert_eq!(beta.browsers, vec!["firefox"]);
}

#[tokio::test]
async fn selecting_a_set_restricts_the_read() {
    let dir = TempDir::new().unwrap();
    write_suite(dir.path(), "one/a.yaml", "alpha");
    write_suite(dir.path(), "two/b.yaml", "beta");

    let mut config = config_for(dir.path(), &["chrome"]);
    config.sets.insert("one".to_string(), set(&["one"], None));
    config.sets.insert("two".to_string(), set(&["two"], None));

    let options = ReadOptions {
        paths: Vec::new(),
        sets: Some(vec!["two".to_string()]),
    };
    let mut emitter = EventEmitter::new();
    let root = read_tests(&options, &config, &mut emitter).await.unwrap();

    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].name, "beta");
}

#[tokio::test]
async fn unknown_set_names_fail_before_anything_runs() {
    let dir = TempDir::new().unwrap();
    write_suite(dir.path(), "one/a.yaml", "alpha");

    let mut config = config_for(dir.path(), &["chrome"]);
    config.sets.insert("one".to_string(), set(&["one"], None));

    let options = ReadOptions {
        paths: Vec::new(),
        sets: Some(vec!["missing".to_string()]),
    };
    let (mut emitter, log) = recording_emitter();
    let err = read_tests(&options, &config, &mut emitter)
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiError::UnknownSets { .. }));
    assert!(err.to_string().contains("missing"));
    assert!(err.to_string().contains("one"));
    assert!(log.borrow().is_empty());
}

#[tokio::test]
async fn domain_build_failures_become_the_sets_kind() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path(), &["chrome"]);

    let options = ReadOptions {
        paths: vec![dir.path().join("does-not-exist")],
        sets: None,
    };
    let mut emitter = EventEmitter::new();
    let err = read_tests(&options, &config, &mut emitter)
        .await
        .unwrap_err();

    match err {
        GeminiError::Sets { message } => {
            assert!(message.contains("Cannot read such file or directory"));
            assert!(message.contains("does-not-exist"));
        }
        other => panic!("expected Sets, got {other:?}"),
    }
}

#[tokio::test]
async fn file_load_failures_propagate_unnormalized() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("gemini/broken.yaml");
    fs::create_dir_all(broken.parent().unwrap()).unwrap();
    fs::write(&broken, "suites: [").unwrap();
    let config = config_for(dir.path(), &["chrome"]);

    let (mut emitter, log) = recording_emitter();
    let err = read_tests(&ReadOptions::default(), &config, &mut emitter)
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiError::Parse { .. }));
    // the before-event fired for the failed file, the after-event did not
    assert_eq!(*log.borrow(), vec![("before", broken)]);
}

#[tokio::test]
async fn rereading_observes_edited_files() {
    let dir = TempDir::new().unwrap();
    let path = write_suite(dir.path(), "gemini/page.yaml", "original");
    let config = config_for(dir.path(), &["chrome"]);

    let mut emitter = EventEmitter::new();
    let first = read_tests(&ReadOptions::default(), &config, &mut emitter)
        .await
        .unwrap();
    assert_eq!(first.children[0].name, "original");

    fs::write(&path, "suites:\n  edited: {}\n").unwrap();

    let second = read_tests(&ReadOptions::default(), &config, &mut emitter)
        .await
        .unwrap();
    assert_eq!(second.children[0].name, "edited");
}

#[tokio::test]
async fn duplicate_suite_names_across_files_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_suite(dir.path(), "gemini/a.yaml", "dup");
    write_suite(dir.path(), "gemini/b.yaml", "dup");
    let config = config_for(dir.path(), &["chrome"]);

    let mut emitter = EventEmitter::new();
    let err = read_tests(&ReadOptions::default(), &config, &mut emitter)
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiError::InvalidSuite { .. }));
    assert!(err.to_string().contains("dup"));
}

#[tokio::test]
async fn excluded_files_are_never_loaded() {
    let dir = TempDir::new().unwrap();
    write_suite(dir.path(), "gemini/kept.yaml", "kept");
    write_suite(dir.path(), "gemini/helpers/skipped.yaml", "skipped");

    let mut config = config_for(dir.path(), &["chrome"]);
    config.system.exclude = vec!["**/helpers/**".to_string()];

    let mut emitter = EventEmitter::new();
    let root = read_tests(&ReadOptions::default(), &config, &mut emitter)
        .await
        .unwrap();

    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].name, "kept");
}
