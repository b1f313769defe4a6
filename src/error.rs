//! Domain-specific error types for the bootstrapper.
//!
//! Internal modules return typed errors while command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error taxonomy
//!
//! ```text
//! ManifestError     — unreadable file, malformed document shape
//! ResolveError      — unknown profile/module/action, profile cycle
//! EnvironmentError  — missing tool, missing input, unsupported host
//! CommandError      — a checked subprocess could not start or exited non-zero
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading and parsing the dependency manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {}: {source}", .path.display())]
    Io {
        /// Path of the manifest.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document does not match the expected shape.
    ///
    /// `serde_yaml` prefixes the message with the offending path, e.g.
    /// `modules.core.packages.apt[1]: ...`.
    #[error("invalid manifest {}: {source}", .path.display())]
    Shape {
        /// Path of the manifest.
        path: PathBuf,
        /// Parser error carrying the field path and location.
        source: serde_yaml::Error,
    },
}

/// Errors raised while expanding profiles and checking references.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A requested or referenced name is neither a profile nor a module.
    #[error("unknown module/profile: {0}")]
    UnknownName(String),

    /// A profile contains itself, directly or transitively.
    #[error("profile cycle detected: {0}")]
    ProfileCycle(String),

    /// An action name has no implementation.
    #[error("unknown action '{action}' in module '{module}'")]
    UnknownAction {
        /// The unrecognised action name.
        action: String,
        /// Module that declared it.
        module: String,
    },

    /// A resolved module name is absent from the module table.
    ///
    /// Unreachable for manifests accepted by the graph resolver; seeing it
    /// means the resolver produced a name it never looked up.
    #[error("internal error: resolved module '{0}' is not defined")]
    MissingModule(String),
}

/// Errors raised when the host cannot satisfy a requirement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    /// A required executable is not on `PATH`.
    #[error("{tool} not found in PATH: {hint}")]
    ToolNotFound {
        /// Executable name.
        tool: String,
        /// What the user should do about it.
        hint: String,
    },

    /// A required configuration value is missing.
    #[error("{0}")]
    MissingInput(String),

    /// The host operating system or distribution is not supported.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// `HOME` is unset or empty.
    #[error("HOME environment variable is not set")]
    NoHome,
}

/// Errors raised by checked subprocess invocations.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The process could not be started.
    #[error("failed to execute: {command}")]
    Spawn {
        /// Shell-quoted command line.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The process exited unsuccessfully.
    #[error(
        "command failed with exit code {}: {command}",
        .code.map_or_else(|| "signal".to_string(), |c| c.to_string())
    )]
    Failed {
        /// Shell-quoted command line.
        command: String,
        /// Exit code, or `None` when terminated by a signal.
        code: Option<i32>,
    },
}

impl CommandError {
    /// Exit code of the failed child process, if it exited normally.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Failed { code, .. } => *code,
            Self::Spawn { .. } => None,
        }
    }
}
