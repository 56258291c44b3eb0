//! Go environment.
//!
//! Provides the locations the resolvers need to classify a file path:
//! the standard library root and the shared module cache.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::util::process::ProcessBuilder;

/// Locations of the Go installation and module cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoEnv {
    /// First GOPATH entry
    gopath: PathBuf,

    /// Standard library installation root, if known
    goroot: Option<PathBuf>,

    /// Module download cache
    mod_cache: PathBuf,
}

impl GoEnv {
    /// Create an environment from explicit paths.
    ///
    /// The module cache defaults to `$GOPATH/pkg/mod`.
    pub fn new(gopath: PathBuf, goroot: Option<PathBuf>) -> Self {
        let mod_cache = gopath.join("pkg").join("mod");
        GoEnv {
            gopath,
            goroot,
            mod_cache,
        }
    }

    /// Read GOPATH, GOROOT and GOMODCACHE from the process environment.
    pub fn from_env() -> Self {
        let gopath = std::env::var_os("GOPATH")
            .and_then(|v| std::env::split_paths(&v).find(|p| !p.as_os_str().is_empty()))
            .unwrap_or_else(default_gopath);
        let goroot = non_empty_var("GOROOT");

        let env = GoEnv::new(gopath, goroot);
        match non_empty_var("GOMODCACHE") {
            Some(cache) => env.with_mod_cache(cache),
            None => env,
        }
    }

    /// Ask the go command for its environment, filling in GOROOT.
    pub fn detect(go: &Path) -> Result<Self> {
        let output = ProcessBuilder::new(go)
            .args(["env", "GOPATH", "GOROOT", "GOMODCACHE"])
            .exec_and_check()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let lines: Vec<&str> = stdout.lines().map(str::trim).collect();

        let [gopath, goroot, mod_cache, ..] = lines.as_slice() else {
            bail!("unexpected output from `go env`: {}", stdout.trim());
        };

        let gopath = std::env::split_paths(gopath)
            .find(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(default_gopath);
        let mut env = GoEnv::new(gopath, (!goroot.is_empty()).then(|| PathBuf::from(goroot)));
        if !mod_cache.is_empty() {
            env = env.with_mod_cache(PathBuf::from(mod_cache));
        }
        Ok(env)
    }

    /// Override the module cache location.
    pub fn with_mod_cache(mut self, mod_cache: PathBuf) -> Self {
        self.mod_cache = mod_cache;
        self
    }

    /// Get the GOPATH.
    pub fn gopath(&self) -> &Path {
        &self.gopath
    }

    /// Get the standard library root.
    pub fn goroot(&self) -> Option<&Path> {
        self.goroot.as_deref()
    }

    /// Get the module cache.
    pub fn mod_cache(&self) -> &Path {
        &self.mod_cache
    }

    /// Check whether a file belongs to the standard library.
    pub fn is_stdlib(&self, file: &Path) -> bool {
        self.goroot
            .as_deref()
            .is_some_and(|root| crate::util::fs::is_inside(file, root))
    }
}

impl Default for GoEnv {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn default_gopath() -> PathBuf {
    directories::BaseDirs::new()
        .map(|b| b.home_dir().join("go"))
        .unwrap_or_else(|| PathBuf::from("go"))
}
