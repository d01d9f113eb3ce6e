use super::Env;
use anyhow::Context;
use clap::Subcommand;
use std::io::Read;
use superclaude_core::sycophancy::{self, HookInput, HookOutcome};

#[derive(Subcommand)]
pub enum HookSubcommand {
    /// Stop hook: block sycophantic replies and ask for a revision
    AntiSycophant,
}

pub fn run(env: &Env, subcmd: HookSubcommand) -> anyhow::Result<()> {
    match subcmd {
        HookSubcommand::AntiSycophant => anti_sycophant(env),
    }
}

fn anti_sycophant(env: &Env) -> anyhow::Result<()> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read hook input")?;
    let input: HookInput = serde_json::from_str(&raw).context("error parsing JSON input")?;

    match sycophancy::evaluate(&input, &env.config.sycophancy) {
        HookOutcome::Pass => {}
        HookOutcome::Block(decision) => println!("{}", serde_json::to_string(&decision)?),
        HookOutcome::Warn(message) => eprintln!("{message}"),
    }
    Ok(())
}
