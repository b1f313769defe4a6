//! Python package installers: `pip --user` and `pipx`.
use super::Invocation;
use crate::config::manifest::PipxEntry;

/// Hint shown when `pipx` is required but missing.
pub const PIPX_HINT: &str = "install it via your system packages first";

/// Single `python3 -m pip install --user` command for all `packages`.
#[must_use]
pub fn pip_install(packages: &[String]) -> Option<Invocation> {
    if packages.is_empty() {
        return None;
    }
    let mut args = vec![
        "-m".to_string(),
        "pip".to_string(),
        "install".to_string(),
        "--user".to_string(),
    ];
    args.extend(packages.iter().cloned());
    Some(Invocation::new("python3", args))
}

/// One `pipx install` command for an entry.
#[must_use]
pub fn pipx_install(entry: &PipxEntry) -> Invocation {
    let mut args = vec!["install".to_string(), entry.name.clone()];
    if let Some(python) = &entry.python {
        args.push("--python".to_string());
        args.push(python.clone());
    }
    Invocation::new("pipx", args)
}
