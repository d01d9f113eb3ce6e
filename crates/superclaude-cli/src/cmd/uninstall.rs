use super::{finish_report, Env};
use anyhow::Context;

/// `superclaude uninstall [COMPONENT...]`: dependents are removed first.
pub fn run(env: &Env, components: &[String], json: bool) -> anyhow::Result<()> {
    tracing::info!("Uninstalling from {}", env.install_dir.display());
    let report = env
        .installer()
        .uninstall(components)
        .context("failed to plan uninstall")?;
    finish_report(&report, json)
}
