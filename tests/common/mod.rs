// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed repository holding a manifest, a
// recording executor that never spawns processes, and a recording logger,
// so each test can drive the install pipeline in isolation.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dotsetup::config::manifest::{MANIFEST_PATH, Manifest};
use dotsetup::error::CommandError;
use dotsetup::exec::{ExecResult, Executor, display_command};
use dotsetup::logging::{Log, TaskEntry, TaskStatus};
use dotsetup::platform::PlatformId;
use dotsetup::tasks::Context;

/// Manifest used by most tests: one default profile over two modules.
pub const BASIC_MANIFEST: &str = "\
profiles:
  default:
    description: Everyday machine
    modules: [core]
  desktop:
    modules: [default, editor]
modules:
  core:
    description: Base command-line tools
    packages:
      apt: [git, curl]
      pacman: [git, curl]
      brew: [git]
  editor:
    packages:
      apt:
        - git
        - any_of: [neovim-nightly, neovim]
    pip: [pynvim]
    actions:
      all: [vim_dirs]
config: {}
";

/// An isolated repository backed by a [`tempfile::TempDir`].
pub struct TestRepo {
    /// Temporary directory containing `setup/dependencies.yaml`.
    pub root: tempfile::TempDir,
}

impl TestRepo {
    /// Create a repository whose manifest is `manifest`.
    pub fn with_manifest(manifest: &str) -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let path = root.path().join(MANIFEST_PATH);
        std::fs::create_dir_all(path.parent().expect("manifest has a parent"))
            .expect("create setup dir");
        std::fs::write(&path, manifest).expect("write manifest");
        Self { root }
    }

    /// Path to the repository root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Load the repository's manifest.
    pub fn manifest(&self) -> Manifest {
        dotsetup::config::load(self.root_path()).expect("load manifest")
    }
}

/// Executor that records commands and never spawns a process.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    /// Commands passed to `run` or `run_unchecked`.
    pub calls: Mutex<Vec<String>>,
    /// Commands passed to `capture`.
    pub lookups: Mutex<Vec<String>>,
    /// Package names reported present by catalog lookups.
    pub catalog: Vec<String>,
    /// Programs reported present on `PATH`.
    pub on_path: Vec<String>,
    /// Checked commands mentioning this word fail with the given code.
    pub fail_on: Option<(String, i32)>,
}

impl RecordingExecutor {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("lookups lock").clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> ExecResult {
        self.calls
            .lock()
            .expect("calls lock")
            .push(display_command(program, args));
        let failed = self
            .fail_on
            .as_ref()
            .filter(|(word, _)| program == word || args.contains(&word.as_str()))
            .map(|(_, code)| *code);
        ExecResult {
            success: failed.is_none(),
            code: Some(failed.unwrap_or(0)),
            ..ExecResult::default()
        }
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError> {
        let result = self.record(program, args);
        if result.success {
            Ok(result)
        } else {
            Err(CommandError::Failed {
                command: display_command(program, args),
                code: result.code,
            })
        }
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError> {
        Ok(self.record(program, args))
    }

    fn capture(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError> {
        self.lookups
            .lock()
            .expect("lookups lock")
            .push(display_command(program, args));
        let found = args
            .last()
            .is_some_and(|name| self.catalog.iter().any(|c| c == name));
        Ok(ExecResult {
            success: found,
            code: Some(i32::from(!found)),
            ..ExecResult::default()
        })
    }

    fn which(&self, program: &str) -> bool {
        self.on_path.iter().any(|p| p == program)
    }
}

/// Logger that keeps every message and stage result.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<(String, String)>>,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl RecordingLog {
    /// Messages logged at `kind` (`stage`, `info`, `dry_run`, ...).
    pub fn messages(&self, kind: &str) -> Vec<String> {
        self.lines
            .lock()
            .expect("lines lock")
            .iter()
            .filter(|(k, _)| k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn tasks(&self) -> Vec<TaskEntry> {
        self.tasks.lock().expect("tasks lock").clone()
    }

    pub fn statuses(&self) -> Vec<(String, TaskStatus)> {
        self.tasks()
            .into_iter()
            .map(|t| (t.name, t.status))
            .collect()
    }

    fn push(&self, kind: &str, msg: &str) {
        self.lines
            .lock()
            .expect("lines lock")
            .push((kind.to_string(), msg.to_string()));
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.tasks.lock().expect("tasks lock").push(TaskEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }
}

/// A run context over recording fakes, with `assume_yes` off and database
/// refresh on.
pub fn context(
    platform: PlatformId,
    dry_run: bool,
    executor: Arc<RecordingExecutor>,
) -> (Context, Arc<RecordingLog>) {
    let log = Arc::new(RecordingLog::default());
    let ctx = Context {
        platform,
        manager: platform.manager(),
        root: PathBuf::from("/dotfiles"),
        home: PathBuf::from("/home/test"),
        user: Some("tester".to_string()),
        dry_run,
        assume_yes: false,
        refresh: true,
        log: Arc::clone(&log) as Arc<dyn Log>,
        executor,
    };
    (ctx, log)
}
