//! Dependency manifest: parsing, validation, and resolution for a platform.
pub mod aggregate;
pub mod manifest;
pub mod profiles;
pub mod selector;
pub mod validation;

use std::path::{Path, PathBuf};

use aggregate::ResolvedManifest;
use manifest::{MANIFEST_PATH, Manifest};

use crate::error::{ManifestError, ResolveError};
use crate::platform::PlatformId;

/// Absolute path of the manifest inside `root`.
#[must_use]
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_PATH)
}

/// Read the manifest of the repository at `root`.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed.
pub fn load(root: &Path) -> Result<Manifest, ManifestError> {
    Manifest::load(&manifest_path(root))
}

/// Expand `requested` names and aggregate their modules for `platform`.
///
/// # Errors
///
/// Returns an error for unknown names or profile cycles.
pub fn resolve<S: AsRef<str>>(
    manifest: &Manifest,
    requested: &[S],
    platform: PlatformId,
) -> Result<ResolvedManifest, ResolveError> {
    let modules = profiles::resolve_modules(requested, &manifest.profiles, &manifest.modules)?;
    aggregate::aggregate(&modules, &manifest.modules, platform)
}
