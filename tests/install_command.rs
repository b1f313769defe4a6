#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the install pipeline: manifest file on disk,
//! resolution, and the ordered execution stages driven through a recording
//! executor.

mod common;

use std::sync::Arc;

use common::{BASIC_MANIFEST, RecordingExecutor, TestRepo, context};
use dotsetup::commands::{exit_code, install::install};
use dotsetup::error::{EnvironmentError, ResolveError};
use dotsetup::logging::TaskStatus;
use dotsetup::platform::PlatformId;

// ---------------------------------------------------------------------------
// Dry run
// ---------------------------------------------------------------------------

/// Ubuntu dry run of the default profile plans the apt commands and spawns
/// nothing.
#[test]
fn ubuntu_dry_run_plans_apt_install() {
    let repo = TestRepo::with_manifest(BASIC_MANIFEST);
    let exec = Arc::new(RecordingExecutor::default());
    let (ctx, log) = context(PlatformId::Ubuntu, true, Arc::clone(&exec));

    install(&repo.manifest(), &["default"], &ctx).unwrap();

    insta::assert_snapshot!(log.messages("dry_run").join("\n"), @r"
    sudo apt-get update
    sudo apt-get install git curl
    ");
    assert!(exec.calls().is_empty());
    assert!(exec.lookups().is_empty());
}

/// Alternatives pick the first candidate in dry run without a catalog lookup.
#[test]
fn dry_run_takes_first_alternative() {
    let repo = TestRepo::with_manifest(BASIC_MANIFEST);
    let exec = Arc::new(RecordingExecutor::default());
    let (ctx, log) = context(PlatformId::Ubuntu, true, Arc::clone(&exec));

    install(&repo.manifest(), &["desktop"], &ctx).unwrap();

    insta::assert_snapshot!(log.messages("dry_run").join("\n"), @r"
    sudo apt-get update
    sudo apt-get install git curl neovim-nightly
    python3 -m pip install --user pynvim
    mkdir -p /home/test/.vim/swap /home/test/.vim/backup
    ");
    assert!(exec.lookups().is_empty());
}

/// Every stage is recorded, in fixed order.
#[test]
fn dry_run_records_every_stage() {
    let repo = TestRepo::with_manifest(BASIC_MANIFEST);
    let (ctx, log) = context(
        PlatformId::Ubuntu,
        true,
        Arc::new(RecordingExecutor::default()),
    );

    install(&repo.manifest(), &["desktop"], &ctx).unwrap();

    let statuses = log.statuses();
    let expected = [
        ("Install system packages", TaskStatus::DryRun),
        ("Install pip packages", TaskStatus::DryRun),
        ("Install pipx applications", TaskStatus::NotApplicable),
        ("Run actions", TaskStatus::DryRun),
        ("Install npm packages", TaskStatus::NotApplicable),
    ];
    assert_eq!(statuses.len(), expected.len());
    for ((name, status), (want_name, want_status)) in statuses.iter().zip(expected) {
        assert_eq!(name, want_name);
        assert_eq!(*status, want_status);
    }
}

// ---------------------------------------------------------------------------
// Real runs through the recording executor
// ---------------------------------------------------------------------------

/// Outside dry run, alternatives are looked up in order and the first
/// available candidate is installed.
#[test]
fn looks_up_alternatives_in_order() {
    let repo = TestRepo::with_manifest(BASIC_MANIFEST);
    let exec = Arc::new(RecordingExecutor {
        catalog: vec!["neovim".to_string()],
        ..RecordingExecutor::default()
    });
    let (mut ctx, _log) = context(PlatformId::Ubuntu, false, Arc::clone(&exec));
    ctx.assume_yes = true;
    ctx.refresh = false;

    install(&repo.manifest(), &["desktop"], &ctx).unwrap();

    assert_eq!(
        exec.lookups(),
        vec!["apt-cache show neovim-nightly", "apt-cache show neovim"]
    );
    assert_eq!(
        exec.calls().first().map(String::as_str),
        Some("sudo apt-get install -y git curl neovim")
    );
}

/// A module reachable twice is installed once, at its first position.
#[test]
fn duplicate_requests_collapse() {
    let repo = TestRepo::with_manifest(BASIC_MANIFEST);
    let exec = Arc::new(RecordingExecutor::default());
    let (ctx, _log) = context(PlatformId::Manjaro, false, Arc::clone(&exec));

    let resolved = install(&repo.manifest(), &["default", "core", "default"], &ctx).unwrap();

    assert_eq!(resolved.modules, vec!["core"]);
    assert_eq!(exec.calls(), vec!["sudo pacman -Syu --needed git curl"]);
}

/// A failing checked command stops the run and carries its exit code.
#[test]
fn failed_install_stops_run_with_exit_code() {
    let repo = TestRepo::with_manifest(BASIC_MANIFEST);
    let exec = Arc::new(RecordingExecutor {
        fail_on: Some(("install".to_string(), 100)),
        ..RecordingExecutor::default()
    });
    let (ctx, log) = context(PlatformId::Ubuntu, false, Arc::clone(&exec));

    let err = install(&repo.manifest(), &["desktop"], &ctx).unwrap_err();

    assert_eq!(exit_code(&err), 100);
    assert!(format!("{err:#}").contains("sudo apt-get install git curl"));
    assert!(!exec.calls().iter().any(|c| c.contains("pip")));
    assert_eq!(
        log.statuses().last().map(|(_, s)| *s),
        Some(TaskStatus::Failed)
    );
}

/// Homebrew must be on PATH outside dry run.
#[test]
fn macos_without_brew_is_an_environment_error() {
    let repo = TestRepo::with_manifest(BASIC_MANIFEST);
    let exec = Arc::new(RecordingExecutor::default());
    let (ctx, _log) = context(PlatformId::Macos, false, Arc::clone(&exec));

    let err = install(&repo.manifest(), &["default"], &ctx).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<EnvironmentError>(),
        Some(EnvironmentError::ToolNotFound { tool, .. }) if tool == "brew"
    ));
    assert!(exec.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Resolution failures happen before any command
// ---------------------------------------------------------------------------

#[test]
fn unknown_module_fails_before_any_command() {
    let repo = TestRepo::with_manifest(BASIC_MANIFEST);
    let exec = Arc::new(RecordingExecutor::default());
    let (ctx, log) = context(PlatformId::Ubuntu, false, Arc::clone(&exec));

    let err = install(&repo.manifest(), &["default", "does-not-exist"], &ctx).unwrap_err();

    assert_eq!(
        err.downcast_ref::<ResolveError>(),
        Some(&ResolveError::UnknownName("does-not-exist".to_string()))
    );
    assert!(exec.calls().is_empty());
    assert!(exec.lookups().is_empty());
    assert!(log.tasks().is_empty());
}

#[test]
fn profile_cycle_fails_before_any_command() {
    let repo = TestRepo::with_manifest(
        "profiles:\n  p1:\n    modules: [p2]\n  p2:\n    modules: [p1]\n",
    );
    let exec = Arc::new(RecordingExecutor::default());
    let (ctx, _log) = context(PlatformId::Ubuntu, false, Arc::clone(&exec));

    let err = install(&repo.manifest(), &["p1"], &ctx).unwrap_err();

    assert_eq!(
        err.downcast_ref::<ResolveError>(),
        Some(&ResolveError::ProfileCycle("p1 → p2 → p1".to_string()))
    );
    assert!(exec.calls().is_empty());
}
