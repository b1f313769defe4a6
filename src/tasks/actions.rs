//! Stage running the resolved named actions.
use anyhow::{Context as _, Result};
use serde_yaml::Mapping;

use super::{Context, Task, TaskResult};
use crate::actions::Action;

/// Run named actions in resolved order, passing each the manifest's
/// `config` mapping.
#[derive(Debug)]
pub struct RunActions {
    actions: Vec<String>,
    config: Mapping,
}

impl RunActions {
    /// Stage for `actions` with the given `config`.
    #[must_use]
    pub const fn new(actions: Vec<String>, config: Mapping) -> Self {
        Self { actions, config }
    }
}

impl Task for RunActions {
    fn name(&self) -> &'static str {
        "Run actions"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.actions.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        // Names were validated after parsing; recheck before anything runs.
        let actions = self
            .actions
            .iter()
            .map(|name| name.parse::<Action>())
            .collect::<Result<Vec<_>, _>>()?;

        for action in actions {
            ctx.log.info(&format!("action: {action}"));
            action
                .run(ctx, &self.config)
                .with_context(|| format!("action '{action}' failed"))?;
        }
        Ok(TaskResult::completed(ctx))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::actions::UnknownAction;
    use crate::platform::PlatformId;
    use crate::tasks::test_helpers::{ScriptedExecutor, make_context};

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn unknown_action_fails_before_running_any() {
        let exec = Arc::new(ScriptedExecutor::default());
        let (ctx, _log) = make_context(PlatformId::Ubuntu, false, exec.clone());
        let task = RunActions::new(names(&["vim_dirs", "vim_plugz"]), Mapping::new());

        let err = task.run(&ctx).unwrap_err();
        assert_eq!(
            err.downcast_ref::<UnknownAction>(),
            Some(&UnknownAction("vim_plugz".to_string()))
        );
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn actions_run_in_order() {
        let exec = Arc::new(ScriptedExecutor::default());
        let (ctx, _log) = make_context(PlatformId::Ubuntu, false, exec.clone());
        let task = RunActions::new(names(&["vim_dirs", "docker_enable"]), Mapping::new());

        assert_eq!(task.run(&ctx).unwrap(), TaskResult::Ok);
        assert_eq!(
            exec.calls(),
            vec![
                "mkdir -p /home/test/.vim/swap /home/test/.vim/backup",
                "sudo usermod -a -G docker tester",
            ]
        );
    }

    #[test]
    fn failing_action_is_named_in_the_error() {
        let exec = Arc::new(ScriptedExecutor::failing_on("mkdir", 1));
        let (ctx, _log) = make_context(PlatformId::Ubuntu, false, exec.clone());
        let task = RunActions::new(names(&["vim_dirs", "tmux_config"]), Mapping::new());

        let err = task.run(&ctx).unwrap_err();
        assert_eq!(err.to_string(), "action 'vim_dirs' failed");
        assert_eq!(exec.calls().len(), 1);
    }

    #[test]
    fn dry_run_prints_action_commands() {
        let exec = Arc::new(ScriptedExecutor::default());
        let (ctx, log) = make_context(PlatformId::Ubuntu, true, exec.clone());
        let task = RunActions::new(names(&["vim_dirs"]), Mapping::new());

        assert_eq!(task.run(&ctx).unwrap(), TaskResult::DryRun);
        assert_eq!(
            log.dry_run_lines(),
            vec!["mkdir -p /home/test/.vim/swap /home/test/.vim/backup"]
        );
        assert!(exec.calls().is_empty());
    }
}
