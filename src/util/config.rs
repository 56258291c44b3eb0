//! Configuration.
//!
//! Settings come from several places, lowest precedence first:
//! - Defaults
//! - Global: `~/.xrepo/config.toml`
//! - Project: `<folder>/.xrepo/config.toml`
//! - LSP `initializationOptions`
//! - `workspace/didChangeConfiguration` settings
//!
//! Individual requests may additionally switch dependency installation on
//! through their own options map.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Option key that turns on dependency installation.
pub const INSTALL_GO_DEPENDENCY: &str = "installGoDependency";

/// Default module proxy used for downloads.
pub const DEFAULT_GO_PROXY: &str = "https://proxy.golang.org";

/// Effective configuration of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Initialize modules and download dependencies through the go command
    pub install_go_dependency: bool,

    /// GOPROXY passed to `go mod download`
    pub go_proxy: String,

    /// Query `?go-get=1` meta tags for hosts without a static rule
    pub remote_repo_lookup: bool,

    /// Explicit path to the go command
    pub go_binary: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            install_go_dependency: false,
            go_proxy: DEFAULT_GO_PROXY.to_string(),
            remote_repo_lookup: true,
            go_binary: None,
        }
    }
}

/// Settings read from a single source. Unset fields leave the value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigLayer {
    #[serde(alias = "install_go_dependency")]
    pub install_go_dependency: Option<bool>,

    #[serde(alias = "go_proxy")]
    pub go_proxy: Option<String>,

    #[serde(alias = "remote_repo_lookup")]
    pub remote_repo_lookup: Option<bool>,

    #[serde(alias = "go_binary")]
    pub go_binary: Option<PathBuf>,
}

impl ConfigLayer {
    /// Load a layer from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load a layer, falling back to an empty one if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Read a layer from a JSON value such as LSP initialization options.
    ///
    /// Anything that is not an object, or does not fit, yields an empty layer.
    pub fn from_json(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed settings: {}", e);
            Self::default()
        })
    }
}

impl Config {
    /// Merge a layer into this config (the layer takes precedence).
    pub fn merge(&mut self, layer: ConfigLayer) {
        if let Some(install) = layer.install_go_dependency {
            self.install_go_dependency = install;
        }
        if let Some(proxy) = layer.go_proxy {
            self.go_proxy = proxy;
        }
        if let Some(lookup) = layer.remote_repo_lookup {
            self.remote_repo_lookup = lookup;
        }
        if layer.go_binary.is_some() {
            self.go_binary = layer.go_binary;
        }
    }

    /// Whether dependencies should be installed for one call.
    ///
    /// A request can only switch installation on, never off.
    pub fn install_dependencies_for(&self, options: Option<&Value>) -> bool {
        if self.install_go_dependency {
            return true;
        }
        options
            .and_then(|opts| opts.get(INSTALL_GO_DEPENDENCY))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Load merged configuration from global and project locations.
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(ConfigLayer::load_or_default(global_path));
    }

    config.merge(ConfigLayer::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.xrepo).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".xrepo"))
}

/// Get the global config path (~/.xrepo/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (<root>/.xrepo/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".xrepo").join("config.toml")
}
