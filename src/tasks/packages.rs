//! System package stage: apt, pacman or Homebrew.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::manifest::PackageEntry;
use crate::resources::package::{ManagerCatalog, resolve_entries};

/// Hint shown when Homebrew is required but missing.
const BREW_HINT: &str = "install Homebrew from https://brew.sh first";

/// Install native packages (and Homebrew casks) with the platform's manager.
#[derive(Debug)]
pub struct InstallSystemPackages {
    packages: Vec<PackageEntry>,
    casks: Vec<String>,
}

impl InstallSystemPackages {
    /// Stage for the given entries and casks.
    #[must_use]
    pub const fn new(packages: Vec<PackageEntry>, casks: Vec<String>) -> Self {
        Self { packages, casks }
    }
}

impl Task for InstallSystemPackages {
    fn name(&self) -> &'static str {
        "Install system packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !self.packages.is_empty() || (ctx.manager.supports_casks() && !self.casks.is_empty())
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if let Some(tool) = ctx.manager.required_tool() {
            ctx.require_tool(tool, BREW_HINT)?;
        }

        let catalog = ManagerCatalog::new(ctx.manager, ctx.executor.as_ref());
        let names = resolve_entries(&self.packages, &catalog, ctx.dry_run);
        for entry in &self.packages {
            if let PackageEntry::Alternatives(candidates) = entry
                && let Some(chosen) = candidates.iter().find(|c| names.contains(c))
            {
                ctx.log.debug(&format!(
                    "alternatives [{}] -> {chosen}",
                    candidates.join(", ")
                ));
            }
        }

        let commands = ctx
            .manager
            .install_commands(&names, &self.casks, ctx.install_options());
        if commands.is_empty() {
            return Ok(TaskResult::Skipped(format!(
                "no packages for {}",
                ctx.manager
            )));
        }

        ctx.log.info(&format!(
            "{} package(s) via {}",
            names.len(),
            ctx.manager
        ));
        for cmd in &commands {
            ctx.run(cmd)?;
        }
        Ok(TaskResult::completed(ctx))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::{CommandError, EnvironmentError};
    use crate::platform::PlatformId;
    use crate::tasks::test_helpers::{ScriptedExecutor, make_context};

    fn literal(names: &[&str]) -> Vec<PackageEntry> {
        names
            .iter()
            .map(|n| PackageEntry::Literal((*n).to_string()))
            .collect()
    }

    #[test]
    fn apt_dry_run_prints_update_and_install() {
        let exec = Arc::new(ScriptedExecutor::default());
        let (ctx, log) = make_context(PlatformId::Ubuntu, true, exec.clone());
        let task = InstallSystemPackages::new(literal(&["git", "curl"]), vec![]);

        assert_eq!(task.run(&ctx).unwrap(), TaskResult::DryRun);
        assert_eq!(
            log.dry_run_lines(),
            vec!["sudo apt-get update", "sudo apt-get install git curl"]
        );
        assert!(exec.calls().is_empty());
        assert!(exec.lookups().is_empty());
    }

    #[test]
    fn alternatives_are_looked_up_outside_dry_run() {
        let exec = Arc::new(ScriptedExecutor {
            catalog: vec!["clangd".to_string()],
            ..ScriptedExecutor::default()
        });
        let (mut ctx, _log) = make_context(PlatformId::Ubuntu, false, exec.clone());
        ctx.refresh = false;
        ctx.assume_yes = true;
        let entries = vec![PackageEntry::Alternatives(vec![
            "clangd-16".to_string(),
            "clangd".to_string(),
        ])];

        let task = InstallSystemPackages::new(entries, vec![]);
        assert_eq!(task.run(&ctx).unwrap(), TaskResult::Ok);
        assert_eq!(
            exec.lookups(),
            vec!["apt-cache show clangd-16", "apt-cache show clangd"]
        );
        assert_eq!(exec.calls(), vec!["sudo apt-get install -y clangd"]);
    }

    #[test]
    fn failing_install_propagates_exit_code() {
        let exec = Arc::new(ScriptedExecutor::failing_on("install", 100));
        let (ctx, _log) = make_context(PlatformId::Ubuntu, false, exec.clone());
        let task = InstallSystemPackages::new(literal(&["git"]), vec![]);

        let err = task.run(&ctx).unwrap_err();
        let cmd_err = err.downcast_ref::<CommandError>().unwrap();
        assert_eq!(cmd_err.exit_code(), Some(100));
        assert_eq!(exec.calls(), vec!["sudo apt-get update", "sudo apt-get install git"]);
    }

    #[test]
    fn brew_requires_brew_on_path() {
        let exec = Arc::new(ScriptedExecutor::default());
        let (ctx, _log) = make_context(PlatformId::Macos, false, exec.clone());
        let task = InstallSystemPackages::new(literal(&["git"]), vec![]);

        let err = task.run(&ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EnvironmentError>(),
            Some(EnvironmentError::ToolNotFound { tool, .. }) if tool == "brew"
        ));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn brew_installs_packages_then_casks() {
        let exec = Arc::new(ScriptedExecutor::with_tools(&["brew"]));
        let (ctx, _log) = make_context(PlatformId::Macos, false, exec.clone());
        let task =
            InstallSystemPackages::new(literal(&["git"]), vec!["iterm2".to_string()]);

        task.run(&ctx).unwrap();
        assert_eq!(
            exec.calls(),
            vec!["brew update", "brew install git", "brew install --cask iterm2"]
        );
    }

    #[test]
    fn casks_alone_do_not_apply_off_macos() {
        let (ctx, _log) =
            make_context(PlatformId::Ubuntu, false, Arc::new(ScriptedExecutor::default()));
        let task = InstallSystemPackages::new(vec![], vec!["iterm2".to_string()]);
        assert!(!task.should_run(&ctx));

        let (mac, _log) =
            make_context(PlatformId::Macos, false, Arc::new(ScriptedExecutor::default()));
        assert!(task.should_run(&mac));
    }

    #[test]
    fn pacman_always_syncs() {
        let exec = Arc::new(ScriptedExecutor::default());
        let (ctx, _log) = make_context(PlatformId::Manjaro, false, exec.clone());
        let task = InstallSystemPackages::new(literal(&["git", "git"]), vec![]);
        task.run(&ctx).unwrap();
        assert_eq!(exec.calls(), vec!["sudo pacman -Syu --needed git"]);
    }
}
