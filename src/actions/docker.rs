use crate::resources::Invocation;
use crate::tasks::Context;

/// Best-effort Docker setup on Linux: group membership and service enable.
/// Both commands are unchecked.
pub(super) fn docker_enable(ctx: &Context) {
    if !ctx.platform.is_linux() {
        ctx.log
            .debug(&format!("docker_enable: nothing to do on {}", ctx.platform));
        return;
    }

    match &ctx.user {
        Some(user) => ctx.run_unchecked(&Invocation::new(
            "sudo",
            ["usermod", "-a", "-G", "docker", user.as_str()],
        )),
        None => ctx.log.warn("docker_enable: invoking user unknown, skipping usermod"),
    }

    if ctx.executor.which("systemctl") {
        ctx.run_unchecked(&Invocation::new(
            "sudo",
            ["systemctl", "enable", "--now", "docker"],
        ));
    }
}
