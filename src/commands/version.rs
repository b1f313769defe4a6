//! Command: print version information.

/// Print the version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("dotsetup {}", crate::version());
}
