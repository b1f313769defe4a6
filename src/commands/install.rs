//! `install`: resolve the requested profile and run the install stages.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::{self, aggregate::ResolvedManifest, manifest::Manifest};
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context, RunOptions};

/// Run the install command.
///
/// The summary is printed whether or not a stage failed.
///
/// # Errors
///
/// Returns an error if setup, resolution, or any stage fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("dotsetup {}", crate::version()));
    let setup = super::CommandSetup::init(global, log.as_ref())?;

    let ctx = Context::new(
        setup.platform,
        setup.root,
        RunOptions {
            dry_run: global.dry_run,
            assume_yes: opts.assume_yes,
            refresh: !opts.no_update,
        },
        Arc::clone(log) as Arc<dyn Log>,
        Arc::new(SystemExecutor),
    )?;

    let result = install(&setup.manifest, &opts.requested(), &ctx);
    log.print_summary();
    result?;
    Ok(())
}

/// Resolve `requested` against `manifest` and run every install stage.
///
/// Resolution finishes before any command runs, so unknown names fail
/// without side effects.
///
/// # Errors
///
/// Returns an error for unknown names, profile cycles, or the first failing
/// stage.
pub fn install<S: AsRef<str>>(
    manifest: &Manifest,
    requested: &[S],
    ctx: &Context,
) -> Result<ResolvedManifest> {
    ctx.log.stage("Resolving modules");
    let resolved = config::resolve(manifest, requested, ctx.platform)?;
    ctx.log.info(&format!(
        "platform: {} (package manager: {})",
        ctx.platform, ctx.manager
    ));
    ctx.log
        .info(&format!("modules: {}", resolved.modules.join(", ")));
    ctx.log.debug(&format!(
        "{} package entries, {} casks, {} pip, {} pipx, {} npm, {} actions",
        resolved.packages.len(),
        resolved.casks.len(),
        resolved.pip.len(),
        resolved.pipx.len(),
        resolved.npm.len(),
        resolved.actions.len()
    ));
    if ctx.dry_run {
        ctx.log.info("dry run: commands are printed, not executed");
    }

    let stages = tasks::install_tasks(&resolved, &manifest.config);
    tasks::execute_all(&stages, ctx)?;
    Ok(resolved)
}
