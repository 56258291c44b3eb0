//! The go command, as used by the module manager.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::process::{find_go, ProcessBuilder};
use crate::util::Config;

/// Module operations delegated to the Go toolchain.
pub trait GoToolchain: Send + Sync {
    /// `go mod init <module_path>` in `folder`.
    fn mod_init(&self, folder: &Path, module_path: &str) -> Result<()>;

    /// `go mod download` in `folder`.
    fn mod_download(&self, folder: &Path) -> Result<()>;
}

/// Runs the real go command.
#[derive(Debug, Clone)]
pub struct GoCommand {
    go: PathBuf,
    proxy: String,
}

impl GoCommand {
    pub fn new(go: impl Into<PathBuf>, proxy: impl Into<String>) -> Self {
        GoCommand {
            go: go.into(),
            proxy: proxy.into(),
        }
    }

    /// Use the configured binary, or whatever `go` can be found.
    pub fn from_config(config: &Config) -> Self {
        let go = config
            .go_binary
            .clone()
            .or_else(find_go)
            .unwrap_or_else(|| PathBuf::from("go"));
        GoCommand::new(go, config.go_proxy.clone())
    }

    pub fn go(&self) -> &Path {
        &self.go
    }

    fn command(&self, folder: &Path) -> ProcessBuilder {
        ProcessBuilder::new(&self.go).cwd(folder)
    }

    fn init_command(&self, folder: &Path, module_path: &str) -> ProcessBuilder {
        self.command(folder).args(["mod", "init", module_path])
    }

    fn download_command(&self, folder: &Path) -> ProcessBuilder {
        self.command(folder)
            .args(["mod", "download"])
            .env("GOPROXY", &self.proxy)
    }
}

impl GoToolchain for GoCommand {
    fn mod_init(&self, folder: &Path, module_path: &str) -> Result<()> {
        self.init_command(folder, module_path)
            .exec_and_check()
            .with_context(|| format!("go mod init failed in {}", folder.display()))?;
        Ok(())
    }

    fn mod_download(&self, folder: &Path) -> Result<()> {
        self.download_command(folder)
            .exec_and_check()
            .with_context(|| format!("go mod download failed in {}", folder.display()))?;
        Ok(())
    }
}
