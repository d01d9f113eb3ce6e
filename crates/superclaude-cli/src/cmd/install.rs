use super::{finish_report, Env};
use anyhow::Context;

/// `superclaude install [COMPONENT...]`: install in dependency order.
pub fn run(env: &Env, components: &[String], force: bool, json: bool) -> anyhow::Result<()> {
    tracing::info!("Installing into {}", env.install_dir.display());
    let report = env
        .installer()
        .install(components, &env.install_config(force))
        .context("failed to plan install")?;
    finish_report(&report, json)
}
