//! Language toolchain bootstrappers: rustup and nvm.
//!
//! Both read an optional section of the manifest's `config` mapping. Any
//! field with the wrong shape falls back to its default.
use anyhow::Result;
use serde_yaml::{Mapping, Value};

use super::{quote, section, string_setting};
use crate::error::EnvironmentError;
use crate::platform::Family;
use crate::resources::Invocation;
use crate::tasks::Context;

const RUSTUP_INSTALL_URL: &str = "https://sh.rustup.rs";
const DEFAULT_TOOLCHAINS: [&str; 2] = ["stable", "nightly"];
const NVM_INSTALL_URL: &str = "https://raw.githubusercontent.com/nvm-sh/nvm/v0.39.1/install.sh";

/// `config.rustup.toolchains`, or the defaults when absent, empty, or not a
/// list of strings.
fn toolchains(rustup: Option<&Mapping>) -> Vec<String> {
    let configured = rustup
        .and_then(|s| s.get("toolchains"))
        .and_then(Value::as_sequence)
        .and_then(|seq| {
            seq.iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .filter(|list| !list.is_empty());
    configured.unwrap_or_else(|| DEFAULT_TOOLCHAINS.map(str::to_string).to_vec())
}

pub(super) fn rustup_toolchains(ctx: &Context, config: &Mapping) -> Result<()> {
    let rustup = section(config, "rustup");
    let install_url = string_setting(rustup, "install_url").unwrap_or(RUSTUP_INSTALL_URL);

    if !ctx.executor.which("rustup") {
        ctx.run(&Invocation::shell(format!(
            "curl -sSf {} | sh -s -- -y",
            quote(install_url)
        )))?;
    }

    let installs = toolchains(rustup)
        .iter()
        .map(|t| format!("rustup toolchain install {}", quote(t)))
        .collect::<Vec<_>>()
        .join(" && ");
    let script = format!(
        "set -e\n\
         if [ -f \"$HOME/.cargo/env\" ]; then . \"$HOME/.cargo/env\"; fi\n\
         rustup default stable || true\n\
         {installs}\n"
    );
    ctx.run(&Invocation::shell(script))?;
    Ok(())
}

/// Node version for the context's platform: the exact platform key first,
/// then its family. Strings and numbers are accepted.
fn node_version(ctx: &Context, nvm: Option<&Mapping>) -> Result<String, EnvironmentError> {
    let versions = nvm
        .and_then(|s| s.get("node_versions"))
        .and_then(Value::as_mapping);
    let keys = std::iter::once(ctx.platform.key()).chain(ctx.platform.family().map(Family::key));

    keys.filter_map(|key| versions?.get(key))
        .find_map(|value| {
            let text = match value {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            (!text.is_empty()).then_some(text)
        })
        .ok_or_else(|| {
            EnvironmentError::MissingInput(format!(
                "missing node version for platform {}",
                ctx.platform
            ))
        })
}

pub(super) fn nvm_node(ctx: &Context, config: &Mapping) -> Result<()> {
    let nvm = section(config, "nvm");
    let install_url = string_setting(nvm, "install_url").unwrap_or(NVM_INSTALL_URL);
    let version = node_version(ctx, nvm)?;

    if !ctx.home.join(".nvm").join("nvm.sh").exists() {
        ctx.run(&Invocation::shell(format!(
            "curl -sSfL {} | bash",
            quote(install_url)
        )))?;
    }

    let version = quote(&version);
    let script = format!(
        "set -e\n\
         export NVM_DIR=\"$HOME/.nvm\"\n\
         [ -s \"$NVM_DIR/nvm.sh\" ] && . \"$NVM_DIR/nvm.sh\"\n\
         nvm install {version}\n\
         nvm alias default {version}\n"
    );
    ctx.run(&Invocation::shell(script))?;
    Ok(())
}
