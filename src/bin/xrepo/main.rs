//! xrepo CLI - workspace module management and cross-repository lookups
//! for Go code

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("xrepo=debug")
    } else {
        EnvFilter::new("xrepo=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Scan(args) => commands::scan::execute(args),
        Commands::Version(args) => commands::version::execute(args),
        Commands::RepoRoot(args) => commands::repo_root::execute(args),
        Commands::Env => commands::env::execute(),
    }
}
