//! Whole-manifest checks run once after parsing, before any command.
//!
//! Errors (unknown references, profile cycles, unknown actions) abort the
//! run. Warnings flag suspicious but usable content.
use std::str::FromStr;

use super::manifest::{Manifest, PackageEntry};
use super::profiles::GraphResolver;
use crate::actions::Action;
use crate::error::ResolveError;
use crate::resources::package::PackageManager;

/// A validation warning detected in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Name of the check that raised it, once [`validate_all`] has run.
    pub check: Option<&'static str>,
    /// Where in the manifest the issue is (e.g. `modules.core.packages.apt`).
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check: None,
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(check) = self.check {
            write!(f, "[{check}] ")?;
        }
        write!(f, "{}: '{}': {}", self.source, self.item, self.message)
    }
}

/// Collected validation outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Fatal problems.
    pub errors: Vec<ResolveError>,
    /// Non-fatal problems.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    fn error(&mut self, error: ResolveError) {
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    fn warn(&mut self, source: impl Into<String>, item: impl Into<String>, message: &str) {
        self.warnings
            .push(ValidationWarning::new(source, item, message));
    }

    /// Whether any fatal problem was found.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A single manifest check.
pub trait ManifestValidator {
    /// Inspect `manifest` and record findings in `report`.
    fn validate(&self, manifest: &Manifest, report: &mut ValidationReport);

    /// Short name used to label findings (e.g. "references", "actions").
    fn name(&self) -> &'static str;
}

/// Profile members must exist and profiles must not contain themselves.
#[derive(Debug)]
pub struct ReferenceValidator;

impl ManifestValidator for ReferenceValidator {
    fn validate(&self, manifest: &Manifest, report: &mut ValidationReport) {
        for profile in manifest.profiles.values() {
            for member in &profile.modules {
                if !manifest.profiles.contains_key(member) && !manifest.modules.contains_key(member)
                {
                    report.error(ResolveError::UnknownName(member.clone()));
                }
            }
        }

        for name in manifest.profiles.keys() {
            let resolver = GraphResolver::new(&manifest.profiles, &manifest.modules);
            if let Err(ResolveError::ProfileCycle(path)) = resolver.resolve(&[name]) {
                // Each member of a loop reports it; keep the first rendering.
                let duplicate = report.errors.iter().any(|e| {
                    matches!(e, ResolveError::ProfileCycle(other) if same_cycle(&path, other))
                });
                if !duplicate {
                    report.error(ResolveError::ProfileCycle(path));
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "references"
    }
}

/// Two rendered cycles `a → b → a` and `b → a → b` describe the same loop.
fn same_cycle(a: &str, b: &str) -> bool {
    let members = |path: &str| {
        let mut parts: Vec<String> = path.split(" → ").map(str::to_string).collect();
        parts.pop();
        parts.sort();
        parts
    };
    members(a) == members(b)
}

/// Every action in every selector branch must be implemented.
#[derive(Debug)]
pub struct ActionValidator;

impl ManifestValidator for ActionValidator {
    fn validate(&self, manifest: &Manifest, report: &mut ValidationReport) {
        for (module_name, module) in &manifest.modules {
            for action in module.actions.all_items() {
                if Action::from_str(action).is_err() {
                    report.error(ResolveError::UnknownAction {
                        action: action.clone(),
                        module: module_name.clone(),
                    });
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "actions"
    }
}

/// Package and cask lists: empty names, unknown managers, misplaced casks.
#[derive(Debug)]
pub struct PackageValidator;

impl ManifestValidator for PackageValidator {
    fn validate(&self, manifest: &Manifest, report: &mut ValidationReport) {
        for (module_name, module) in &manifest.modules {
            for (manager, entries) in &module.packages {
                let source = format!("modules.{module_name}.packages.{manager}");
                if PackageManager::from_key(manager).is_none() {
                    report.warn(
                        &source,
                        manager,
                        "unknown package manager; entries are never installed",
                    );
                }
                for entry in entries {
                    match entry {
                        PackageEntry::Literal(name) if name.trim().is_empty() => {
                            report.warn(&source, name, "package name is empty");
                        }
                        PackageEntry::Alternatives(candidates)
                            if candidates.iter().any(|c| c.trim().is_empty()) =>
                        {
                            report.warn(
                                &source,
                                candidates.join(", "),
                                "alternatives contain an empty candidate",
                            );
                        }
                        _ => {}
                    }
                }
            }

            for (manager, casks) in &module.casks {
                let source = format!("modules.{module_name}.casks.{manager}");
                if PackageManager::from_key(manager).is_none_or(|m| !m.supports_casks()) {
                    report.warn(&source, manager, "casks are only installed with brew");
                }
                for cask in casks.iter().filter(|c| c.trim().is_empty()) {
                    report.warn(&source, cask, "cask name is empty");
                }
            }

            for (field, names) in [
                ("pip", module.pip.all_items().collect::<Vec<_>>()),
                ("npm", module.npm.all_items().collect()),
            ] {
                for name in names.into_iter().filter(|n| n.trim().is_empty()) {
                    report.warn(
                        format!("modules.{module_name}.{field}"),
                        name,
                        "package name is empty",
                    );
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "packages"
    }
}

/// Names defined as both a profile and a module.
#[derive(Debug)]
pub struct NameCollisionValidator;

impl ManifestValidator for NameCollisionValidator {
    fn validate(&self, manifest: &Manifest, report: &mut ValidationReport) {
        for name in manifest.profiles.keys() {
            if manifest.modules.contains_key(name) {
                report.warn(
                    "profiles",
                    name,
                    "defined as both a profile and a module; the profile is used",
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "names"
    }
}

/// Selector mappings with keys that match no platform.
#[derive(Debug)]
pub struct SelectorKeyValidator;

impl ManifestValidator for SelectorKeyValidator {
    fn validate(&self, manifest: &Manifest, report: &mut ValidationReport) {
        for (module_name, module) in &manifest.modules {
            let fields = [
                ("pip", module.pip.unknown_keys()),
                ("pipx", module.pipx.unknown_keys()),
                ("npm", module.npm.unknown_keys()),
                ("actions", module.actions.unknown_keys()),
            ];
            for (field, keys) in fields {
                for key in keys {
                    report.warn(
                        format!("modules.{module_name}.{field}"),
                        key,
                        "unknown selector key; branch never applies",
                    );
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "selectors"
    }
}

/// Run every validator over `manifest`.
#[must_use]
pub fn validate_all(manifest: &Manifest) -> ValidationReport {
    let validators: Vec<Box<dyn ManifestValidator>> = vec![
        Box::new(ReferenceValidator),
        Box::new(ActionValidator),
        Box::new(PackageValidator),
        Box::new(NameCollisionValidator),
        Box::new(SelectorKeyValidator),
    ];

    let mut report = ValidationReport::default();
    for validator in validators {
        let first_new = report.warnings.len();
        validator.validate(manifest, &mut report);
        for warning in report.warnings.iter_mut().skip(first_new) {
            warning.check = Some(validator.name());
        }
    }
    report
}
