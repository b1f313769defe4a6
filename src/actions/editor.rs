use anyhow::Result;

use crate::resources::Invocation;
use crate::tasks::Context;

const VIM_PLUG_URL: &str = "https://raw.githubusercontent.com/junegunn/vim-plug/master/plug.vim";

pub(super) fn vim_dirs(ctx: &Context) -> Result<()> {
    let vim = ctx.home.join(".vim");
    ctx.run(&Invocation::new(
        "mkdir",
        [
            "-p".to_string(),
            vim.join("swap").display().to_string(),
            vim.join("backup").display().to_string(),
        ],
    ))?;
    Ok(())
}

pub(super) fn vim_plug(ctx: &Context) -> Result<()> {
    let dest = ctx.home.join(".vim").join("autoload").join("plug.vim");
    if dest.exists() {
        ctx.log.debug(&format!("{} already present", dest.display()));
        return Ok(());
    }
    ctx.run(&Invocation::new(
        "curl",
        [
            "-fLo".to_string(),
            dest.display().to_string(),
            "--create-dirs".to_string(),
            VIM_PLUG_URL.to_string(),
        ],
    ))?;
    Ok(())
}
