use super::Env;
use crate::output::print_json;
use superclaude_core::prompt::PromptOptimizer;

/// `superclaude optimize <REQUEST...>`: classify the request and print the
/// scaffold built from the current directory's project context.
pub fn run(env: &Env, request: &str, json: bool) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let optimizer = PromptOptimizer::from_dir(&cwd, &env.config.prompt);
    let prompt = optimizer.optimize(request);

    if json {
        return print_json(&prompt);
    }

    println!("=== ORIGINAL REQUEST ===");
    println!("{}", prompt.original);
    println!("\n=== REQUEST TYPE DETECTED ===");
    println!("{}", prompt.request_type);
    println!("\n=== SCAFFOLDED PROMPT (EXECUTING) ===");
    println!("{}", prompt.scaffolded);
    println!("\n=== EXECUTING NOW ===");
    Ok(())
}
