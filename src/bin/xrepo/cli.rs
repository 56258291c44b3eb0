//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// xrepo - workspace module management and cross-repository lookups for Go
#[derive(Parser)]
#[command(name = "xrepo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find and create module roots in workspace folders
    Scan(ScanArgs),

    /// Print the version encoded in a module cache path
    Version(VersionArgs),

    /// Print the repository URL hosting an import path
    RepoRoot(RepoRootArgs),

    /// Show the Go environment in use
    Env,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Workspace folders to scan
    #[arg(required = true)]
    pub folders: Vec<PathBuf>,

    /// Run `go mod init` and `go mod download` instead of writing module files
    #[arg(long, env = "XREPO_INSTALL_DEPS")]
    pub install_deps: bool,

    /// Leave synthesized module files in place
    #[arg(long)]
    pub keep: bool,
}

#[derive(Args)]
pub struct VersionArgs {
    /// Source file inside the module cache
    pub file: PathBuf,

    /// Module cache directory (defaults to GOMODCACHE or $GOPATH/pkg/mod)
    #[arg(long, env = "GOMODCACHE")]
    pub mod_cache: Option<PathBuf>,
}

#[derive(Args)]
pub struct RepoRootArgs {
    /// Import path, e.g. github.com/pkg/errors
    pub import_path: String,

    /// Only use the built-in host rules
    #[arg(long)]
    pub offline: bool,
}
