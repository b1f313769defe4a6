use anyhow::Result;

use crate::resources::Invocation;
use crate::tasks::Context;

const OH_MY_TMUX_REPO: &str = "https://github.com/gpakosz/.tmux";
const TPM_REPO: &str = "https://github.com/tmux-plugins/tpm";

/// Clone the tmux configuration and TPM when absent, and link
/// `~/.tmux.conf` into the clone.
pub(super) fn tmux_config(ctx: &Context) -> Result<()> {
    let tmux_dir = ctx.home.join(".tmux");
    let tpm_dir = tmux_dir.join("plugins").join("tpm");

    if !tmux_dir.exists() {
        ctx.run(&clone(OH_MY_TMUX_REPO, &tmux_dir.display().to_string()))?;
    }
    ctx.run(&Invocation::new(
        "ln",
        [
            "-sf".to_string(),
            tmux_dir.join(".tmux.conf").display().to_string(),
            ctx.home.join(".tmux.conf").display().to_string(),
        ],
    ))?;
    if !tpm_dir.exists() {
        ctx.run(&clone(TPM_REPO, &tpm_dir.display().to_string()))?;
    }
    Ok(())
}

fn clone(repo: &str, dest: &str) -> Invocation {
    Invocation::new("git", ["clone", repo, dest])
}
