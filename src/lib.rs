//! Declarative dotfiles bootstrapper.
//!
//! Reads `setup/dependencies.yaml`, a manifest of named *modules* (package
//! lists, auxiliary installers, setup actions) and *profiles* (nested bundles
//! of modules), resolves it for the host platform, and drives apt, pacman
//! or Homebrew plus pip, pipx, npm and a closed set of scripted actions.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: parse, validate and resolve the manifest
//! - **[`resources`]**: command builders for managers and installers
//! - **[`actions`]**: the named setup actions
//! - **[`tasks`]**: ordered execution stages and the run [`tasks::Context`]
//! - **[`commands`]**: subcommand orchestration (`install`, `check`, `list`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;

/// Version string: `DOTSETUP_VERSION` from the build script, else the crate
/// version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DOTSETUP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}
