use super::{finish_report, Env};
use anyhow::Context;

/// `superclaude update [COMPONENT...]`: reinstall components whose registered
/// version differs, restoring the previous files when a reinstall fails.
pub fn run(env: &Env, components: &[String], json: bool) -> anyhow::Result<()> {
    tracing::info!("Updating components in {}", env.install_dir.display());
    let report = env
        .installer()
        .update(components, &env.install_config(false))
        .context("failed to plan update")?;
    finish_report(&report, json)
}
