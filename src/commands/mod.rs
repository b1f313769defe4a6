//! Subcommand orchestration: root discovery, manifest loading, validation.
pub mod check;
pub mod install;
pub mod list;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::manifest::{MANIFEST_PATH, Manifest};
use crate::config::validation::{ValidationReport, validate_all};
use crate::config::{self, manifest_path};
use crate::error::CommandError;
use crate::logging::Log;
use crate::platform::PlatformId;

/// Environment variable naming the repository root.
pub const ROOT_ENV: &str = "DOTSETUP_ROOT";

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Repository root.
    pub root: PathBuf,
    /// Target platform.
    pub platform: PlatformId,
    /// Parsed and validated manifest.
    pub manifest: Manifest,
}

impl CommandSetup {
    /// Locate the repository, pick the platform, then load and validate the
    /// manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be found, the platform is
    /// unsupported, the manifest is malformed, or validation reports errors.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let root = resolve_root(global)?;
        log.debug(&format!("root: {}", root.display()));

        let platform = match global.platform {
            Some(platform) => {
                log.debug(&format!("platform: {platform} (override)"));
                platform
            }
            None => {
                let platform = PlatformId::detect()?;
                log.debug(&format!("platform: {platform} (detected)"));
                platform
            }
        };

        let manifest = load_validated(&root, log)?;
        Ok(Self {
            root,
            platform,
            manifest,
        })
    }
}

/// Load the manifest at `root` and run the validation pass, logging every
/// warning and error.
///
/// # Errors
///
/// Returns an error if the manifest cannot be parsed or has validation
/// errors.
pub fn load_validated(root: &Path, log: &dyn Log) -> Result<Manifest> {
    let manifest = config::load(root)?;
    log.debug(&format!(
        "{} profiles, {} modules",
        manifest.profiles.len(),
        manifest.modules.len()
    ));
    let report = validate_all(&manifest);
    let errors = report_problems(&report, log);
    if errors > 0 {
        anyhow::bail!(
            "{} has {errors} error(s)",
            manifest_path(root).display()
        );
    }
    Ok(manifest)
}

/// Log a validation report; returns the number of errors.
pub fn report_problems(report: &ValidationReport, log: &dyn Log) -> usize {
    if !report.warnings.is_empty() {
        log.warn(&format!(
            "found {} manifest warning(s):",
            report.warnings.len()
        ));
        for warning in &report.warnings {
            log.warn(&format!("  {warning}"));
        }
    }
    for error in &report.errors {
        log.error(&error.to_string());
    }
    report.errors.len()
}

/// Whether `dir` looks like a repository root.
fn is_root(dir: &Path) -> bool {
    dir.join(MANIFEST_PATH).is_file()
}

fn checked_root(dir: &Path, source: &str) -> Result<PathBuf> {
    if !is_root(dir) {
        anyhow::bail!(
            "{} from {source} does not contain {MANIFEST_PATH}",
            dir.display()
        );
    }
    dunce::canonicalize(dir).with_context(|| format!("cannot resolve {}", dir.display()))
}

/// Resolve the repository root: `--root`, then `DOTSETUP_ROOT`, then the
/// binary's ancestors, then the current directory and its ancestors.
///
/// # Errors
///
/// Returns an error if an explicit root lacks the manifest or no candidate
/// contains it.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(root) = &global.root {
        return checked_root(root, "--root");
    }

    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return checked_root(Path::new(&root), ROOT_ENV);
    }

    // e.g. <root>/target/release/dotsetup or <root>/bin/dotsetup
    if let Ok(exe) = std::env::current_exe()
        && let Some(found) = exe.ancestors().skip(1).find(|d| is_root(d))
    {
        return checked_root(found, "binary location");
    }

    let cwd = std::env::current_dir()?;
    if let Some(found) = cwd.ancestors().find(|d| is_root(d)) {
        return checked_root(found, "current directory");
    }

    anyhow::bail!(
        "cannot find {MANIFEST_PATH}; use --root or set {ROOT_ENV}"
    );
}

/// Process exit code for a failed command: the failing child's exit code
/// when there is one, else 1.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CommandError>())
        .and_then(CommandError::exit_code)
        .and_then(|code| u8::try_from(code).ok())
        .filter(|code| *code != 0)
        .unwrap_or(1)
}
