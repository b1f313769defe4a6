//! Execution stages that turn a resolved manifest into commands.
mod context;
pub mod actions;
pub mod npm;
pub mod packages;
pub mod python;

pub use context::{Context, RunOptions};

use anyhow::Result;
use serde_yaml::Mapping;

use crate::config::aggregate::ResolvedManifest;
use crate::logging::TaskStatus;

/// Outcome of a stage that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Every command ran successfully.
    Ok,
    /// Nothing was run, for the given reason.
    Skipped(String),
    /// Commands were printed, not run.
    DryRun,
}

impl TaskResult {
    /// `DryRun` in dry-run mode, otherwise `Ok`.
    #[must_use]
    pub const fn completed(ctx: &Context) -> Self {
        if ctx.dry_run { Self::DryRun } else { Self::Ok }
    }
}

/// A named execution stage.
pub trait Task {
    /// Human-readable stage name.
    fn name(&self) -> &str;

    /// Whether the stage has anything to do.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the stage.
    ///
    /// # Errors
    ///
    /// Returns an error if a checked command fails, a required tool is
    /// missing, or an action cannot run.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The install stages for `resolved`, in execution order.
///
/// System packages come first, then `pip` and `pipx`, then actions. npm
/// runs last because an action earlier in the run may install node.
#[must_use]
pub fn install_tasks(resolved: &ResolvedManifest, config: &Mapping) -> Vec<Box<dyn Task>> {
    vec![
        Box::new(packages::InstallSystemPackages::new(
            resolved.packages.clone(),
            resolved.casks.clone(),
        )),
        Box::new(python::InstallPipPackages::new(resolved.pip.clone())),
        Box::new(python::InstallPipxApps::new(resolved.pipx.clone())),
        Box::new(actions::RunActions::new(
            resolved.actions.clone(),
            config.clone(),
        )),
        Box::new(npm::InstallNpmPackages::new(resolved.npm.clone())),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error after recording it as failed; callers stop the
/// run there.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping stage: {} (nothing to do)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            Ok(())
        }
        Err(e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            Err(e.context(format!("stage '{}' failed", task.name())))
        }
    }
}

/// Execute `tasks` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first stage error.
pub fn execute_all(tasks: &[Box<dyn Task>], ctx: &Context) -> Result<()> {
    for task in tasks {
        execute(task.as_ref(), ctx)?;
    }
    Ok(())
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::platform::PlatformId;
    use test_helpers::{ScriptedExecutor, make_context};

    struct MockTask {
        name: &'static str,
        should_run: bool,
        result: Result<TaskResult, String>,
    }

    impl Task for MockTask {
        fn name(&self) -> &str {
            self.name
        }
        fn should_run(&self, _ctx: &Context) -> bool {
            self.should_run
        }
        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            self.result.clone().map_err(|s| anyhow::anyhow!("{s}"))
        }
    }

    fn mock(name: &'static str, should_run: bool, result: Result<TaskResult, String>) -> MockTask {
        MockTask {
            name,
            should_run,
            result,
        }
    }

    fn context() -> (Context, Arc<test_helpers::RecordingLog>) {
        make_context(PlatformId::Ubuntu, false, Arc::new(ScriptedExecutor::default()))
    }

    #[test]
    fn execute_records_not_applicable() {
        let (ctx, log) = context();
        execute(&mock("idle", false, Ok(TaskResult::Ok)), &ctx).unwrap();
        assert_eq!(log.tasks()[0].status, TaskStatus::NotApplicable);
        assert!(log.lines().iter().all(|l| !l.starts_with("stage:")));
    }

    #[test]
    fn execute_records_ok_with_stage_header() {
        let (ctx, log) = context();
        execute(&mock("ok-task", true, Ok(TaskResult::Ok)), &ctx).unwrap();
        assert_eq!(log.tasks()[0].status, TaskStatus::Ok);
        assert!(log.lines().contains(&"stage: ok-task".to_string()));
    }

    #[test]
    fn execute_records_skip_reason() {
        let (ctx, log) = context();
        let task = mock("skip-task", true, Ok(TaskResult::Skipped("not needed".into())));
        execute(&task, &ctx).unwrap();
        assert_eq!(log.tasks()[0].status, TaskStatus::Skipped);
        assert_eq!(log.tasks()[0].message.as_deref(), Some("not needed"));
    }

    #[test]
    fn execute_records_dry_run() {
        let (ctx, log) = context();
        execute(&mock("dry-task", true, Ok(TaskResult::DryRun)), &ctx).unwrap();
        assert_eq!(log.tasks()[0].status, TaskStatus::DryRun);
    }

    #[test]
    fn execute_returns_error_and_records_failure() {
        let (ctx, log) = context();
        let err = execute(&mock("fail-task", true, Err("kaboom".into())), &ctx).unwrap_err();
        assert!(format!("{err:#}").contains("kaboom"));
        assert!(err.to_string().contains("fail-task"));
        assert_eq!(log.tasks()[0].status, TaskStatus::Failed);
    }

    #[test]
    fn execute_all_stops_at_first_failure() {
        let (ctx, log) = context();
        let tasks: Vec<Box<dyn Task>> = vec![
            Box::new(mock("first", true, Ok(TaskResult::Ok))),
            Box::new(mock("second", true, Err("boom".into()))),
            Box::new(mock("third", true, Ok(TaskResult::Ok))),
        ];
        assert!(execute_all(&tasks, &ctx).is_err());
        let names: Vec<_> = log.tasks().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn install_tasks_follow_fixed_order() {
        let tasks = install_tasks(&ResolvedManifest::default(), &Mapping::new());
        let names: Vec<_> = tasks.iter().map(|t| t.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "Install system packages",
                "Install pip packages",
                "Install pipx applications",
                "Run actions",
                "Install npm packages",
            ]
        );
    }

    #[test]
    fn completed_reflects_dry_run() {
        let (ctx, _log) =
            make_context(PlatformId::Ubuntu, true, Arc::new(ScriptedExecutor::default()));
        assert_eq!(TaskResult::completed(&ctx), TaskResult::DryRun);
        let (ctx, _log) = context();
        assert_eq!(TaskResult::completed(&ctx), TaskResult::Ok);
    }
}
