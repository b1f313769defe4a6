//! `pip --user` and `pipx` stages.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::manifest::PipxEntry;
use crate::resources::pip::{PIPX_HINT, pip_install, pipx_install};

/// Install Python packages into the user site with `pip --user`.
#[derive(Debug)]
pub struct InstallPipPackages {
    packages: Vec<String>,
}

impl InstallPipPackages {
    /// Stage for `packages`.
    #[must_use]
    pub const fn new(packages: Vec<String>) -> Self {
        Self { packages }
    }
}

impl Task for InstallPipPackages {
    fn name(&self) -> &'static str {
        "Install pip packages"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.packages.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(cmd) = pip_install(&self.packages) else {
            return Ok(TaskResult::Skipped("no pip packages".to_string()));
        };
        ctx.run(&cmd)?;
        Ok(TaskResult::completed(ctx))
    }
}

/// Install isolated Python applications with `pipx`, one command per entry.
#[derive(Debug)]
pub struct InstallPipxApps {
    apps: Vec<PipxEntry>,
}

impl InstallPipxApps {
    /// Stage for `apps`.
    #[must_use]
    pub const fn new(apps: Vec<PipxEntry>) -> Self {
        Self { apps }
    }
}

impl Task for InstallPipxApps {
    fn name(&self) -> &'static str {
        "Install pipx applications"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.apps.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        ctx.require_tool("pipx", PIPX_HINT)?;
        for app in &self.apps {
            ctx.run(&pipx_install(app))?;
        }
        Ok(TaskResult::completed(ctx))
    }
}
