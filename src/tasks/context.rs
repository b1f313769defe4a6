use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{CommandError, EnvironmentError};
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::PlatformId;
use crate::resources::Invocation;
use crate::resources::package::{InstallOptions, PackageManager};

/// Flags taken from the command line that shape a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Print commands instead of running them.
    pub dry_run: bool,
    /// Pass non-interactive confirmation flags to package managers.
    pub assume_yes: bool,
    /// Refresh the package database before installing.
    pub refresh: bool,
}

/// Immutable run configuration shared by every task.
///
/// Built once from CLI input; nothing below the command layer consults the
/// process environment for home directory or user name.
pub struct Context {
    /// Target platform (detected or overridden).
    pub platform: PlatformId,
    /// Native package manager derived from [`Context::platform`].
    pub manager: PackageManager,
    /// Root of the dotfiles repository.
    pub root: PathBuf,
    /// User's home directory.
    pub home: PathBuf,
    /// Invoking user (`SUDO_USER`, else `USER`).
    pub user: Option<String>,
    /// Whether to print commands instead of running them.
    pub dry_run: bool,
    /// Whether to pass non-interactive confirmation flags.
    pub assume_yes: bool,
    /// Whether to refresh the package database first.
    pub refresh: bool,
    /// Logger for output and stage recording.
    pub log: Arc<dyn Log>,
    /// Command executor (real processes or a test fake).
    pub executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("platform", &self.platform)
            .field("manager", &self.manager)
            .field("root", &self.root)
            .field("home", &self.home)
            .field("user", &self.user)
            .field("dry_run", &self.dry_run)
            .field("assume_yes", &self.assume_yes)
            .field("refresh", &self.refresh)
            .field("log", &"<dyn Log>")
            .field("executor", &self.executor)
            .finish()
    }
}

/// Home directory from the value of `HOME`.
fn home_dir(value: Option<OsString>) -> Result<PathBuf, EnvironmentError> {
    value
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .ok_or(EnvironmentError::NoHome)
}

impl Context {
    /// Creates a context, reading `HOME` and the invoking user from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::NoHome`] if `HOME` is unset or empty.
    pub fn new(
        platform: PlatformId,
        root: PathBuf,
        options: RunOptions,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
    ) -> Result<Self, EnvironmentError> {
        let home = home_dir(std::env::var_os("HOME"))?;
        let user = ["SUDO_USER", "USER"]
            .into_iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|u| !u.is_empty());

        Ok(Self {
            platform,
            manager: platform.manager(),
            root,
            home,
            user,
            dry_run: options.dry_run,
            assume_yes: options.assume_yes,
            refresh: options.refresh,
            log,
            executor,
        })
    }

    /// Install flags for [`PackageManager::install_commands`].
    #[must_use]
    pub const fn install_options(&self) -> InstallOptions {
        InstallOptions {
            assume_yes: self.assume_yes,
            refresh: self.refresh,
        }
    }

    /// Run a checked command, or print it in dry-run mode.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the command cannot start or exits
    /// non-zero.
    pub fn run(&self, cmd: &Invocation) -> Result<(), CommandError> {
        if self.dry_run {
            self.log.dry_run(&cmd.to_string());
            return Ok(());
        }
        self.log.debug(&format!("$ {cmd}"));
        self.executor.run(&cmd.program, &cmd.arg_refs())?;
        Ok(())
    }

    /// Run a best-effort command; failures are logged and swallowed.
    pub fn run_unchecked(&self, cmd: &Invocation) {
        if self.dry_run {
            self.log.dry_run(&cmd.to_string());
            return;
        }
        self.log.debug(&format!("$ {cmd}"));
        match self.executor.run_unchecked(&cmd.program, &cmd.arg_refs()) {
            Ok(result) if result.success => {}
            Ok(result) => self.log.warn(&format!(
                "ignoring failure (exit code {}): {cmd}",
                result
                    .code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string())
            )),
            Err(e) => self.log.warn(&format!("ignoring failure: {e}")),
        }
    }

    /// Fail unless `tool` is on `PATH`. Always passes in dry-run mode.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::ToolNotFound`] with `hint` attached.
    pub fn require_tool(&self, tool: &str, hint: &str) -> Result<(), EnvironmentError> {
        if self.dry_run || self.executor.which(tool) {
            return Ok(());
        }
        Err(EnvironmentError::ToolNotFound {
            tool: tool.to_string(),
            hint: hint.to_string(),
        })
    }
}
