mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::hook::HookSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "superclaude",
    about = "Install, update, and validate SuperClaude components for the Claude assistant",
    version,
    propagate_version = true
)]
struct Cli {
    /// Assistant configuration directory (default: ~/.claude)
    #[arg(long, global = true, env = "SUPERCLAUDE_INSTALL_DIR")]
    install_dir: Option<PathBuf>,

    /// Directory holding component sources (default: nearest SuperClaude/ above cwd)
    #[arg(long, global = true, env = "SUPERCLAUDE_SOURCE_DIR")]
    source_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Show debug logs
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install components (all when none are named)
    Install {
        components: Vec<String>,

        /// Reinstall even if the current version is already registered
        #[arg(long)]
        force: bool,
    },

    /// Remove installed components (all when none are named)
    Uninstall { components: Vec<String> },

    /// Update components whose registered version is out of date
    Update { components: Vec<String> },

    /// Check installed files and registrations
    Validate { components: Vec<String> },

    /// Show available components and their install state
    List,

    /// Scaffold a casual request into a structured prompt
    Optimize {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        request: Vec<String>,
    },

    /// Run a hook payload (reads the hook event JSON from stdin)
    Hook {
        #[command(subcommand)]
        subcommand: HookSubcommand,
    },
}

/// `RUST_LOG` wins when set; otherwise log at the command's default level.
fn log_filter(default_level: tracing::Level) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        match &cli.command {
            Commands::Install { .. } | Commands::Uninstall { .. } | Commands::Update { .. } => {
                tracing::Level::INFO
            }
            _ => tracing::Level::WARN,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(default_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = cmd::Env::resolve(cli.install_dir.as_deref(), cli.source_dir.as_deref())
        .and_then(|env| match cli.command {
            Commands::Install { components, force } => {
                cmd::install::run(&env, &components, force, cli.json)
            }
            Commands::Uninstall { components } => cmd::uninstall::run(&env, &components, cli.json),
            Commands::Update { components } => cmd::update::run(&env, &components, cli.json),
            Commands::Validate { components } => cmd::validate::run(&env, &components, cli.json),
            Commands::List => cmd::list::run(&env, cli.json),
            Commands::Optimize { request } => cmd::optimize::run(&env, &request.join(" "), cli.json),
            Commands::Hook { subcommand } => cmd::hook::run(&env, subcommand),
        });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
