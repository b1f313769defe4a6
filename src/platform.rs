//! Host platform identification and the platform → package manager mapping.
use std::fmt;
use std::path::Path;

use crate::error::EnvironmentError;
use crate::resources::package::PackageManager;

/// Path of the distribution identification file on Linux hosts.
const OS_RELEASE: &str = "/etc/os-release";

/// Selector key that applies on every platform.
pub const SELECTOR_ALL: &str = "all";

/// Supported platform identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum PlatformId {
    /// macOS with Homebrew.
    Macos,
    /// Ubuntu and Debian derivatives with APT.
    Ubuntu,
    /// Manjaro and Arch derivatives with pacman.
    Manjaro,
}

/// Broader operating-system family a platform belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Any Linux distribution.
    Linux,
}

impl Family {
    /// Selector key naming this family.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Linux => "linux",
        }
    }
}

impl PlatformId {
    /// Every supported platform, in declaration order.
    pub const ALL: [Self; 3] = [Self::Macos, Self::Ubuntu, Self::Manjaro];

    /// Exact selector key for this platform.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Macos => "macos",
            Self::Ubuntu => "ubuntu",
            Self::Manjaro => "manjaro",
        }
    }

    /// The family this platform belongs to, if any.
    #[must_use]
    pub const fn family(self) -> Option<Family> {
        match self {
            Self::Ubuntu | Self::Manjaro => Some(Family::Linux),
            Self::Macos => None,
        }
    }

    /// Whether this platform is a Linux distribution.
    #[must_use]
    pub const fn is_linux(self) -> bool {
        matches!(self.family(), Some(Family::Linux))
    }

    /// The native package manager for this platform.
    #[must_use]
    pub const fn manager(self) -> PackageManager {
        match self {
            Self::Macos => PackageManager::Brew,
            Self::Ubuntu => PackageManager::Apt,
            Self::Manjaro => PackageManager::Pacman,
        }
    }

    /// Selector keys applicable to this platform, in precedence order:
    /// `all`, then the family key (if any), then the exact platform key.
    #[must_use]
    pub fn selector_keys(self) -> Vec<&'static str> {
        let mut keys = vec![SELECTOR_ALL];
        if let Some(family) = self.family() {
            keys.push(family.key());
        }
        keys.push(self.key());
        keys
    }

    /// Parse a platform from its exact key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Detect the platform of the running host.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system or Linux distribution is not
    /// one of the supported platforms.
    pub fn detect() -> Result<Self, EnvironmentError> {
        match std::env::consts::OS {
            "macos" => Ok(Self::Macos),
            "linux" => {
                let content = if Path::new(OS_RELEASE).exists() {
                    std::fs::read_to_string(OS_RELEASE).unwrap_or_default()
                } else {
                    String::new()
                };
                Self::from_os_release(&content)
            }
            other => Err(EnvironmentError::UnsupportedPlatform(format!(
                "unsupported OS: {other}"
            ))),
        }
    }

    /// Identify a Linux distribution from `/etc/os-release` content.
    ///
    /// # Errors
    ///
    /// Returns an error naming `ID` and `ID_LIKE` when neither matches a
    /// supported distribution.
    pub fn from_os_release(content: &str) -> Result<Self, EnvironmentError> {
        let fields = parse_os_release(content);
        let lookup = |key: &str| {
            fields
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.to_lowercase())
                .unwrap_or_default()
        };
        let id = lookup("ID");
        let id_like = lookup("ID_LIKE");
        let like = |name: &str| id_like.split_whitespace().any(|l| l == name);

        if id == "ubuntu" || like("ubuntu") || like("debian") {
            return Ok(Self::Ubuntu);
        }
        if id == "manjaro" || id == "arch" || like("arch") {
            return Ok(Self::Manjaro);
        }

        Err(EnvironmentError::UnsupportedPlatform(format!(
            "unsupported Linux distro: ID={id:?} ID_LIKE={id_like:?}"
        )))
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parse `KEY=value` lines, skipping blanks and comments and stripping quotes.
fn parse_os_release(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| {
            (
                k.trim().to_string(),
                v.trim().trim_matches('"').trim_matches('\'').to_string(),
            )
        })
        .collect()
}
