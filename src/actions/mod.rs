//! Named setup actions referenced from a module's `actions` list.
//!
//! The set is closed: [`Action`] enumerates every implementation and
//! [`Action::from_str`](std::str::FromStr::from_str) rejects anything else,
//! so the validation pass can refuse unknown names before a command runs.
//! Each action receives the run [`Context`] and the manifest's free-form
//! `config` mapping.
mod docker;
mod editor;
mod tmux;
mod toolchains;

use std::str::FromStr;

use anyhow::Result;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::tasks::Context;

/// An action name with no implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

/// Every supported action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Create `~/.vim/swap` and `~/.vim/backup`.
    VimDirs,
    /// Download vim-plug into `~/.vim/autoload`.
    VimPlug,
    /// Install the gpakosz tmux configuration and TPM.
    TmuxConfig,
    /// Add the user to the `docker` group and enable the service (Linux).
    DockerEnable,
    /// Bootstrap rustup and install toolchains.
    RustupToolchains,
    /// Bootstrap nvm and install the configured node version.
    NvmNode,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::VimDirs,
        Self::VimPlug,
        Self::TmuxConfig,
        Self::DockerEnable,
        Self::RustupToolchains,
        Self::NvmNode,
    ];

    /// Name used in the manifest.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::VimDirs => "vim_dirs",
            Self::VimPlug => "vim_plug",
            Self::TmuxConfig => "tmux_config",
            Self::DockerEnable => "docker_enable",
            Self::RustupToolchains => "rustup_toolchains",
            Self::NvmNode => "nvm_node",
        }
    }

    /// Perform the action.
    ///
    /// # Errors
    ///
    /// Returns an error if a checked command fails or required
    /// configuration is missing.
    pub fn run(self, ctx: &Context, config: &Mapping) -> Result<()> {
        match self {
            Self::VimDirs => editor::vim_dirs(ctx),
            Self::VimPlug => editor::vim_plug(ctx),
            Self::TmuxConfig => tmux::tmux_config(ctx),
            Self::DockerEnable => {
                docker::docker_enable(ctx);
                Ok(())
            }
            Self::RustupToolchains => toolchains::rustup_toolchains(ctx, config),
            Self::NvmNode => toolchains::nvm_node(ctx, config),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// The `key` sub-mapping of `config`; absent or malformed sections read as
/// empty.
fn section<'a>(config: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    config.get(key).and_then(Value::as_mapping)
}

/// A non-empty string value under `key` in `section`.
fn string_setting<'a>(section: Option<&'a Mapping>, key: &str) -> Option<&'a str> {
    section?
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Quote a value for interpolation into a `bash -lc` script.
fn quote(value: &str) -> std::borrow::Cow<'_, str> {
    shlex::try_quote(value).unwrap_or(std::borrow::Cow::Borrowed(value))
}
