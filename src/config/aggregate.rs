//! Aggregation of resolved modules into per-category install lists.
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

use super::manifest::{Module, PackageEntry, PipxEntry};
use crate::error::ResolveError;
use crate::platform::PlatformId;
use crate::resources::package::PackageManager;

/// Everything one run installs, before alternatives are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedManifest {
    /// Module names in install order.
    pub modules: Vec<String>,
    /// Package entries for the platform's manager.
    pub packages: Vec<PackageEntry>,
    /// Homebrew casks.
    pub casks: Vec<String>,
    /// `pip --user` packages.
    pub pip: Vec<String>,
    /// `pipx` applications.
    pub pipx: Vec<PipxEntry>,
    /// Global npm packages.
    pub npm: Vec<String>,
    /// Action names in execution order.
    pub actions: Vec<String>,
}

impl ResolvedManifest {
    /// Whether the run has nothing to do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
            && self.casks.is_empty()
            && self.pip.is_empty()
            && self.pipx.is_empty()
            && self.npm.is_empty()
            && self.actions.is_empty()
    }
}

/// Collect the contributions of `module_names`, in order, for `platform`.
///
/// Each category is de-duplicated independently, keeping the first
/// occurrence.
///
/// # Errors
///
/// Returns [`ResolveError::MissingModule`] if a name is not in `modules`.
pub fn aggregate(
    module_names: &[String],
    modules: &BTreeMap<String, Module>,
    platform: PlatformId,
) -> Result<ResolvedManifest, ResolveError> {
    let manager = platform.manager();
    let mut out = ResolvedManifest {
        modules: module_names.to_vec(),
        ..ResolvedManifest::default()
    };

    for name in module_names {
        let module = modules
            .get(name)
            .ok_or_else(|| ResolveError::MissingModule(name.clone()))?;

        if let Some(entries) = module.packages.get(manager.key()) {
            out.packages.extend(entries.iter().cloned());
        }
        if manager == PackageManager::Brew
            && let Some(casks) = module.casks.get(manager.key())
        {
            out.casks.extend(casks.iter().cloned());
        }
        out.pip.extend(module.pip.evaluate(platform));
        out.pipx.extend(module.pipx.evaluate(platform));
        out.npm.extend(module.npm.evaluate(platform));
        out.actions.extend(module.actions.evaluate(platform));
    }

    dedup_in_place(&mut out.packages);
    dedup_in_place(&mut out.casks);
    dedup_in_place(&mut out.pip);
    dedup_in_place(&mut out.pipx);
    dedup_in_place(&mut out.npm);
    dedup_in_place(&mut out.actions);
    Ok(out)
}

/// Remove repeated items, keeping the first occurrence of each.
pub fn dedup_in_place<T: Eq + Hash + Clone>(items: &mut Vec<T>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}
