//! scopeup - update every npm package under a scope.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};

use scopeup::cli;

/// scopeup - update every npm package under a scope
#[derive(Parser)]
#[command(name = "scopeup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(flatten)]
    update: cli::UpdateArgs,
}

fn main() {
    let cli = Cli::parse();

    // Default to INFO unless verbose is set (then DEBUG), or RUST_LOG overrides it.
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "scopeup", &mut std::io::stdout());
        return Ok(());
    }

    cli::cmd_update(cli.update)
}
