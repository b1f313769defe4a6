//! `list`: print profiles and modules.
use std::fmt::Write as _;

use anyhow::Result;

use crate::cli::{GlobalOpts, ListOpts};
use crate::config::{self, manifest::Manifest, profiles::resolve_modules};

/// Run the list command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or the requested
/// profile does not resolve.
#[allow(clippy::print_stdout)]
pub fn run(global: &GlobalOpts, opts: &ListOpts) -> Result<()> {
    let root = super::resolve_root(global)?;
    let manifest = config::load(&root)?;
    print!("{}", render(&manifest, opts.profile.as_deref())?);
    Ok(())
}

/// Text listing of `manifest`: all profiles and modules, or the module
/// expansion of `profile`.
///
/// # Errors
///
/// Returns an error if `profile` names an unknown entry or a cycle.
pub fn render(manifest: &Manifest, profile: Option<&str>) -> Result<String> {
    let mut out = String::new();

    if let Some(name) = profile {
        let modules = resolve_modules(&[name], &manifest.profiles, &manifest.modules)?;
        writeln!(out, "{name} expands to {} module(s):", modules.len())?;
        for module in &modules {
            let description = manifest
                .modules
                .get(module)
                .and_then(|m| m.description.as_deref());
            write_entry(&mut out, module, description)?;
        }
        return Ok(out);
    }

    writeln!(out, "Profiles:")?;
    for (name, p) in &manifest.profiles {
        let members = format!("[{}]", p.modules.join(", "));
        let description = match &p.description {
            Some(d) => format!("{d} {members}"),
            None => members,
        };
        write_entry(&mut out, name, Some(&description))?;
    }
    writeln!(out, "Modules:")?;
    for (name, m) in &manifest.modules {
        write_entry(&mut out, name, m.description.as_deref())?;
    }
    Ok(out)
}

fn write_entry(out: &mut String, name: &str, description: Option<&str>) -> std::fmt::Result {
    match description {
        Some(d) => writeln!(out, "  {name:<16} {d}"),
        None => writeln!(out, "  {name}"),
    }
}
