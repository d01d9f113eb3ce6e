use super::Env;
use crate::output::print_json;
use anyhow::Context;

/// `superclaude validate [COMPONENT...]`: report every problem found.
pub fn run(env: &Env, components: &[String], json: bool) -> anyhow::Result<()> {
    let reports = env
        .installer()
        .validate(components)
        .context("failed to validate")?;

    if json {
        print_json(&serde_json::json!({ "components": reports }))?;
    } else {
        for r in &reports {
            if r.valid {
                println!("{}: valid", r.component);
            } else {
                println!("{}: invalid", r.component);
                for e in &r.errors {
                    println!("  - {e}");
                }
            }
        }
    }

    let invalid: Vec<&str> = reports
        .iter()
        .filter(|r| !r.valid)
        .map(|r| r.component.as_str())
        .collect();
    if !invalid.is_empty() {
        anyhow::bail!("validation failed for: {}", invalid.join(", "));
    }
    Ok(())
}
