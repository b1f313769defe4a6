//! `check`: validate the manifest and resolve every profile on every platform.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::{self, manifest::Manifest, validation::validate_all};
use crate::logging::{Log, Logger, TaskStatus};
use crate::platform::PlatformId;

const STAGE_VALIDATE: &str = "Validate manifest";
const STAGE_RESOLVE: &str = "Resolve profiles";

/// Run the check command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or any problem is
/// found.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let root = super::resolve_root(global)?;
    log.stage("Loading manifest");
    let manifest = config::load(&root)?;
    log.info(&format!(
        "{}: {} profiles, {} modules",
        config::manifest_path(&root).display(),
        manifest.profiles.len(),
        manifest.modules.len()
    ));

    let problems = check(&manifest, log);
    log.print_summary();
    if problems > 0 {
        anyhow::bail!("{problems} problem(s) found");
    }
    Ok(())
}

/// Validate `manifest` and resolve every profile for every platform,
/// logging findings. Returns the number of errors.
pub fn check(manifest: &Manifest, log: &dyn Log) -> usize {
    log.stage(STAGE_VALIDATE);
    let report = validate_all(manifest);
    let errors = super::report_problems(&report, log);
    record(log, STAGE_VALIDATE, errors);

    log.stage(STAGE_RESOLVE);
    let mut failures = 0;
    for name in manifest.profiles.keys() {
        for platform in PlatformId::ALL {
            match config::resolve(manifest, &[name], platform) {
                Ok(resolved) => log.debug(&format!(
                    "{name} on {platform}: {} module(s), {} package entr(ies), {} action(s)",
                    resolved.modules.len(),
                    resolved.packages.len(),
                    resolved.actions.len()
                )),
                Err(e) => {
                    log.error(&format!("{name} on {platform}: {e}"));
                    failures += 1;
                }
            }
        }
    }
    record(log, STAGE_RESOLVE, failures);

    errors + failures
}

fn record(log: &dyn Log, stage: &str, problems: usize) {
    if problems == 0 {
        log.record_task(stage, TaskStatus::Ok, None);
    } else {
        log.record_task(
            stage,
            TaskStatus::Failed,
            Some(&format!("{problems} problem(s)")),
        );
    }
}
