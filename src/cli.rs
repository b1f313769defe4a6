//! Command-line interface definitions.
use clap::{Parser, Subcommand};

use crate::config::profiles::DEFAULT_PROFILE;
use crate::platform::PlatformId;

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "dotsetup",
    about = "Declarative dotfiles bootstrapper: profiles, modules, packages and actions",
    version = crate::version()
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Override the repository root (must contain setup/dependencies.yaml)
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,

    /// Target platform instead of detecting the host
    #[arg(long, global = true, value_enum)]
    pub platform: Option<PlatformId>,

    /// Print commands without running them
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the packages and run the actions of a profile
    Install(InstallOpts),
    /// Validate the manifest and resolve every profile on every platform
    Check,
    /// List profiles and modules
    List(ListOpts),
    /// Print shell completions to stdout
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// Profile to install
    #[arg(short, long, default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Extra module or profile to install (repeatable)
    #[arg(short, long = "module")]
    pub modules: Vec<String>,

    /// Answer yes to package manager prompts
    #[arg(short = 'y', long = "yes")]
    pub assume_yes: bool,

    /// Skip the package database refresh
    #[arg(long = "no-update")]
    pub no_update: bool,
}

impl InstallOpts {
    /// Names to resolve: the profile followed by extra modules.
    #[must_use]
    pub fn requested(&self) -> Vec<String> {
        std::iter::once(self.profile.clone())
            .chain(self.modules.iter().cloned())
            .collect()
    }
}

/// Options for the `list` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ListOpts {
    /// Show the module expansion of this profile
    #[arg(short, long)]
    pub profile: Option<String>,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
