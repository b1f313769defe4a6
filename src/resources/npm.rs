//! Global npm package installs.
//!
//! With nvm, `npm` is often missing from `PATH` in non-interactive shells,
//! so the install runs as a login-shell script that sources `nvm.sh` first.
use std::borrow::Cow;

use super::Invocation;

/// Single login-shell command that installs `packages` globally.
#[must_use]
pub fn npm_install(packages: &[String]) -> Option<Invocation> {
    if packages.is_empty() {
        return None;
    }
    let quoted = packages
        .iter()
        .map(|p| shlex::try_quote(p).unwrap_or(Cow::Borrowed(p.as_str())))
        .collect::<Vec<_>>()
        .join(" ");
    let script = format!(
        r#"set -e
if ! command -v npm >/dev/null 2>&1; then
  export NVM_DIR="$HOME/.nvm"
  [ -s "$NVM_DIR/nvm.sh" ] && . "$NVM_DIR/nvm.sh"
fi
if ! command -v npm >/dev/null 2>&1; then
  echo "npm not found. Install Node.js first (e.g. include a module with the nvm_node action)." >&2
  exit 1
fi
npm i -g {quoted}
"#
    );
    Some(Invocation::shell(script))
}
