//! Command builders for the package managers and auxiliary installers.
//!
//! Each builder returns [`Invocation`] values describing the external
//! commands to run. Nothing here spawns processes; execution (or dry-run
//! printing) is the job of [`crate::tasks::Context`].
pub mod npm;
pub mod package;
pub mod pip;

use crate::exec::display_command;

/// A single external command: program plus arguments.
///
/// # Examples
///
/// ```
/// use dotsetup::resources::Invocation;
///
/// let cmd = Invocation::new("sudo", ["apt-get", "update"]);
/// assert_eq!(cmd.to_string(), "sudo apt-get update");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute (looked up on `PATH`).
    pub program: String,
    /// Arguments passed verbatim, without shell interpretation.
    pub args: Vec<String>,
}

impl Invocation {
    /// Build an invocation from a program and any iterable of arguments.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a `bash -lc <script>` invocation.
    #[must_use]
    pub fn shell(script: impl Into<String>) -> Self {
        Self::new("bash", ["-lc".to_string(), script.into()])
    }

    /// Borrow the arguments as string slices for [`crate::exec::Executor`].
    #[must_use]
    pub fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&display_command(&self.program, &self.arg_refs()))
    }
}
