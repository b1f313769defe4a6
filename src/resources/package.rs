//! Native package managers: catalog lookups, install commands, and the
//! alternatives resolver.
use std::collections::HashSet;

use super::Invocation;
use crate::config::manifest::PackageEntry;
use crate::exec::Executor;

/// Supported native package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    /// Debian/Ubuntu APT.
    Apt,
    /// Arch/Manjaro pacman.
    Pacman,
    /// Homebrew on macOS.
    Brew,
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Options controlling how install commands are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    /// Pass the manager's non-interactive confirmation flag.
    pub assume_yes: bool,
    /// Refresh the package database before installing.
    pub refresh: bool,
}

impl PackageManager {
    /// Every supported manager.
    pub const ALL: [Self; 3] = [Self::Apt, Self::Pacman, Self::Brew];

    /// Key used for this manager in the manifest's `packages` mapping.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Pacman => "pacman",
            Self::Brew => "brew",
        }
    }

    /// Parse a manager from its manifest key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    /// Whether this manager installs casks.
    #[must_use]
    pub const fn supports_casks(self) -> bool {
        matches!(self, Self::Brew)
    }

    /// Binary that must be on `PATH` before installing, if the manager is
    /// not part of the base system.
    #[must_use]
    pub const fn required_tool(self) -> Option<&'static str> {
        match self {
            Self::Brew => Some("brew"),
            Self::Apt | Self::Pacman => None,
        }
    }

    /// Command that succeeds when `name` exists in the manager's catalog.
    #[must_use]
    pub fn lookup(self, name: &str) -> Invocation {
        match self {
            Self::Apt => Invocation::new("apt-cache", ["show", name]),
            Self::Pacman => Invocation::new("pacman", ["-Si", name]),
            Self::Brew => Invocation::new("brew", ["info", name]),
        }
    }

    /// Commands that install `packages` (and `casks`, for Homebrew).
    ///
    /// Returns an empty list when there is nothing to install. pacman always
    /// refreshes via `-Syu`, so [`InstallOptions::refresh`] only affects APT
    /// and Homebrew.
    #[must_use]
    pub fn install_commands(
        self,
        packages: &[String],
        casks: &[String],
        opts: InstallOptions,
    ) -> Vec<Invocation> {
        let casks: &[String] = if self.supports_casks() { casks } else { &[] };
        if packages.is_empty() && casks.is_empty() {
            return Vec::new();
        }

        let mut commands = Vec::new();
        match self {
            Self::Apt => {
                if opts.refresh {
                    commands.push(Invocation::new("sudo", ["apt-get", "update"]));
                }
                let mut args = vec!["apt-get".to_string(), "install".to_string()];
                if opts.assume_yes {
                    args.push("-y".to_string());
                }
                args.extend(packages.iter().cloned());
                commands.push(Invocation::new("sudo", args));
            }
            Self::Pacman => {
                let mut args = vec![
                    "pacman".to_string(),
                    "-Syu".to_string(),
                    "--needed".to_string(),
                ];
                if opts.assume_yes {
                    args.push("--noconfirm".to_string());
                }
                args.extend(packages.iter().cloned());
                commands.push(Invocation::new("sudo", args));
            }
            Self::Brew => {
                if opts.refresh {
                    commands.push(Invocation::new("brew", ["update"]));
                }
                if !packages.is_empty() {
                    let mut args = vec!["install".to_string()];
                    args.extend(packages.iter().cloned());
                    commands.push(Invocation::new("brew", args));
                }
                if !casks.is_empty() {
                    let mut args = vec!["install".to_string(), "--cask".to_string()];
                    args.extend(casks.iter().cloned());
                    commands.push(Invocation::new("brew", args));
                }
            }
        }
        commands
    }
}

/// Existence check against a package catalog.
#[cfg_attr(test, mockall::automock)]
pub trait PackageCatalog {
    /// Whether `name` is available from the catalog.
    fn exists(&self, name: &str) -> bool;
}

/// [`PackageCatalog`] that queries a real manager through an [`Executor`].
#[derive(Debug)]
pub struct ManagerCatalog<'a> {
    manager: PackageManager,
    executor: &'a dyn Executor,
}

impl<'a> ManagerCatalog<'a> {
    /// Create a catalog for `manager` that runs queries via `executor`.
    #[must_use]
    pub const fn new(manager: PackageManager, executor: &'a dyn Executor) -> Self {
        Self { manager, executor }
    }
}

impl PackageCatalog for ManagerCatalog<'_> {
    fn exists(&self, name: &str) -> bool {
        if let Some(tool) = self.manager.required_tool()
            && !self.executor.which(tool)
        {
            return false;
        }
        let cmd = self.manager.lookup(name);
        self.executor
            .capture(&cmd.program, &cmd.arg_refs())
            .is_ok_and(|r| r.success)
    }
}

/// Resolve package entries into concrete, de-duplicated names.
///
/// Literal names pass through. For alternatives, the first candidate the
/// catalog reports as available wins; if none is available the first
/// candidate is chosen anyway and the install step surfaces the failure.
/// In dry-run mode the catalog is never called and the first candidate is
/// used directly.
#[must_use]
pub fn resolve_entries(
    entries: &[PackageEntry],
    catalog: &dyn PackageCatalog,
    dry_run: bool,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();
    for entry in entries {
        let name = match entry {
            PackageEntry::Literal(name) => name.as_str(),
            PackageEntry::Alternatives(candidates) => {
                let Some(name) = choose_candidate(candidates, catalog, dry_run) else {
                    continue;
                };
                name
            }
        };
        if seen.insert(name) {
            resolved.push(name.to_string());
        }
    }
    resolved
}

fn choose_candidate<'e>(
    candidates: &'e [String],
    catalog: &dyn PackageCatalog,
    dry_run: bool,
) -> Option<&'e str> {
    let first = candidates.first()?;
    if dry_run {
        return Some(first);
    }
    Some(
        candidates
            .iter()
            .find(|c| catalog.exists(c))
            .unwrap_or(first),
    )
}
