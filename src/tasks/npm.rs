//! Deferred global npm install stage.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::npm::npm_install;

/// Install global npm packages.
///
/// Scheduled after the actions stage: node is usually installed by the
/// `nvm_node` action in the same run.
#[derive(Debug)]
pub struct InstallNpmPackages {
    packages: Vec<String>,
}

impl InstallNpmPackages {
    /// Stage for `packages`.
    #[must_use]
    pub const fn new(packages: Vec<String>) -> Self {
        Self { packages }
    }
}

impl Task for InstallNpmPackages {
    fn name(&self) -> &'static str {
        "Install npm packages"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.packages.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(cmd) = npm_install(&self.packages) else {
            return Ok(TaskResult::Skipped("no npm packages".to_string()));
        };
        ctx.run(&cmd)?;
        Ok(TaskResult::completed(ctx))
    }
}
