//! Expansion of profile and module names into an ordered module list.
use std::collections::{BTreeMap, HashSet};

use super::manifest::{Module, Profile};
use crate::error::ResolveError;

/// Profile used when none is requested.
pub const DEFAULT_PROFILE: &str = "default";

/// Depth-first expander over the profile reference graph.
#[derive(Debug)]
pub struct GraphResolver<'a> {
    profiles: &'a BTreeMap<String, Profile>,
    modules: &'a BTreeMap<String, Module>,
    /// Profiles currently being expanded, outermost first.
    path: Vec<&'a str>,
    /// Profiles already fully expanded.
    expanded: HashSet<&'a str>,
    seen: HashSet<&'a str>,
    result: Vec<String>,
}

impl<'a> GraphResolver<'a> {
    /// Create a resolver over the given profile and module tables.
    #[must_use]
    pub fn new(
        profiles: &'a BTreeMap<String, Profile>,
        modules: &'a BTreeMap<String, Module>,
    ) -> Self {
        Self {
            profiles,
            modules,
            path: Vec::new(),
            expanded: HashSet::new(),
            seen: HashSet::new(),
            result: Vec::new(),
        }
    }

    /// Expand `requested` names, in order, into de-duplicated module names.
    ///
    /// A name that is both a profile and a module is treated as a profile.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownName`] for a name that is neither a
    /// profile nor a module, and [`ResolveError::ProfileCycle`] when a
    /// profile contains itself directly or transitively.
    pub fn resolve<S: AsRef<str>>(mut self, requested: &[S]) -> Result<Vec<String>, ResolveError> {
        for name in requested {
            self.visit(name.as_ref())?;
        }
        Ok(self.result)
    }

    fn visit(&mut self, name: &str) -> Result<(), ResolveError> {
        let (profiles, modules) = (self.profiles, self.modules);
        if let Some((key, profile)) = profiles.get_key_value(name) {
            let key = key.as_str();
            if let Some(start) = self.path.iter().position(|p| *p == key) {
                let cycle = self
                    .path
                    .iter()
                    .skip(start)
                    .copied()
                    .chain(std::iter::once(key))
                    .collect::<Vec<_>>()
                    .join(" → ");
                return Err(ResolveError::ProfileCycle(cycle));
            }
            if self.expanded.contains(key) {
                return Ok(());
            }
            self.path.push(key);
            for member in &profile.modules {
                self.visit(member)?;
            }
            self.path.pop();
            self.expanded.insert(key);
            return Ok(());
        }

        let Some((key, _)) = modules.get_key_value(name) else {
            return Err(ResolveError::UnknownName(name.to_string()));
        };
        if self.seen.insert(key.as_str()) {
            self.result.push(key.clone());
        }
        Ok(())
    }
}

/// Expand `requested` profile and module names into module names.
///
/// # Errors
///
/// See [`GraphResolver::resolve`].
pub fn resolve_modules<S: AsRef<str>>(
    requested: &[S],
    profiles: &BTreeMap<String, Profile>,
    modules: &BTreeMap<String, Module>,
) -> Result<Vec<String>, ResolveError> {
    GraphResolver::new(profiles, modules).resolve(requested)
}
