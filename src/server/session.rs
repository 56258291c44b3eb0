//! Per-client state: settings, workspace folders and module files to
//! clean up.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use serde_json::Value;
use tower_lsp::lsp_types::WorkspaceFolder;
use tracing::{debug, info};

use crate::modules::{cleanup_folders, GoCommand, GoToolchain, ModuleManager, VendorRegistry};
use crate::util::config::{project_config_path, ConfigLayer};
use crate::util::{Config, FileSystem, RealFs};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Settings pushed by the client.
#[derive(Debug, Clone, Default)]
struct ClientSettings {
    /// `initializationOptions` as sent
    raw_options: Option<Value>,
    initialization: ConfigLayer,
    workspace: ConfigLayer,
}

/// State shared by all requests of one client connection.
pub struct Session {
    base: Config,
    settings: RwLock<ClientSettings>,
    folders: Mutex<Vec<WorkspaceFolder>>,
    cleanup: Mutex<Vec<PathBuf>>,
    // Held while folders are processed so that only one scan writes at a
    // time. Set once the session has been cleaned up.
    closed: Mutex<bool>,
    fs: Arc<dyn FileSystem>,
    toolchain: Option<Arc<dyn GoToolchain>>,
    vendor: Arc<VendorRegistry>,
}

impl Session {
    /// A session on the real filesystem with the process-wide vendor
    /// registry. `base` holds defaults and the global config file.
    pub fn new(base: Config) -> Self {
        Session {
            base,
            settings: RwLock::new(ClientSettings::default()),
            folders: Mutex::new(Vec::new()),
            cleanup: Mutex::new(Vec::new()),
            closed: Mutex::new(false),
            fs: Arc::new(RealFs),
            toolchain: None,
            vendor: VendorRegistry::global(),
        }
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Use `toolchain` instead of the go command named by the config.
    pub fn with_toolchain(mut self, toolchain: Arc<dyn GoToolchain>) -> Self {
        self.toolchain = Some(toolchain);
        self
    }

    pub fn with_vendor_registry(mut self, vendor: Arc<VendorRegistry>) -> Self {
        self.vendor = vendor;
        self
    }

    pub fn vendor_registry(&self) -> &Arc<VendorRegistry> {
        &self.vendor
    }

    fn settings(&self) -> ClientSettings {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Record the client's `initializationOptions`.
    pub fn set_initialization_options(&self, options: Option<Value>) {
        let mut settings = self.settings.write().unwrap_or_else(|e| e.into_inner());
        settings.initialization = options
            .as_ref()
            .map(ConfigLayer::from_json)
            .unwrap_or_default();
        settings.raw_options = options;
    }

    /// Record settings from `workspace/didChangeConfiguration`.
    ///
    /// Settings may come bare or nested under an `xrepo` section.
    pub fn set_workspace_settings(&self, settings: &Value) {
        let section = settings.get("xrepo").unwrap_or(settings);
        self.settings
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .workspace = ConfigLayer::from_json(section);
    }

    /// `initializationOptions` as sent by the client.
    pub fn initialization_options(&self) -> Option<Value> {
        self.settings().raw_options
    }

    /// Effective configuration without any project file.
    pub fn config(&self) -> Config {
        self.layered(None)
    }

    /// Effective configuration for a workspace folder.
    pub fn config_for(&self, folder: &Path) -> Config {
        self.layered(Some(folder))
    }

    fn layered(&self, folder: Option<&Path>) -> Config {
        let mut config = self.base.clone();
        if let Some(folder) = folder {
            config.merge(ConfigLayer::load_or_default(&project_config_path(folder)));
        }
        let settings = self.settings();
        config.merge(settings.initialization);
        config.merge(settings.workspace);
        config
    }

    /// Folders currently tracked, module folders included.
    pub fn folders(&self) -> Vec<WorkspaceFolder> {
        lock(&self.folders).clone()
    }

    pub fn add_folders(&self, added: &[WorkspaceFolder]) {
        let mut folders = lock(&self.folders);
        for folder in added {
            if !folders.contains(folder) {
                folders.push(folder.clone());
            }
        }
    }

    pub fn remove_folders(&self, removed: &[WorkspaceFolder]) {
        lock(&self.folders).retain(|f| !removed.iter().any(|r| r.uri == f.uri));
    }

    /// Folders holding module files written by this session.
    pub fn cleanup_folders(&self) -> Vec<PathBuf> {
        lock(&self.cleanup).clone()
    }

    /// Bring every folder under module management.
    ///
    /// Folders are handled one after the other. Returns the folders with
    /// the discovered module folders appended; those are tracked too.
    /// Blocks on the filesystem and the go command. After [`cleanup`]
    /// nothing is written and the folders come back unchanged.
    ///
    /// [`cleanup`]: Session::cleanup
    pub fn manage_deps(
        &self,
        folders: Vec<WorkspaceFolder>,
        options: Option<&Value>,
    ) -> Vec<WorkspaceFolder> {
        let closed = lock(&self.closed);
        if *closed {
            debug!("session closed, not managing {} folders", folders.len());
            return folders;
        }
        let mut result: Vec<WorkspaceFolder> = Vec::new();

        for root in folders {
            let config = match root.uri.to_file_path() {
                Ok(dir) => self.config_for(&dir),
                Err(()) => self.config(),
            };
            let install = config.install_dependencies_for(options);
            let toolchain = match &self.toolchain {
                Some(toolchain) => toolchain.clone(),
                None => Arc::new(GoCommand::from_config(&config)),
            };

            let mut manager = ModuleManager::new(install, self.fs.clone(), toolchain, self.vendor.clone());
            let mut group = vec![root];
            manager.manage(&mut group);
            lock(&self.cleanup).extend(manager.take_cleanup_folders());

            for folder in group {
                if !result.contains(&folder) {
                    result.push(folder);
                }
            }
        }

        info!("{} workspace folders under module management", result.len());
        self.add_folders(&result);
        result
    }

    /// Remove the module files this session wrote and close the session.
    ///
    /// Waits for a running [`manage_deps`] to finish. Runs once; later
    /// calls find nothing to do.
    ///
    /// [`manage_deps`]: Session::manage_deps
    pub fn cleanup(&self) {
        let mut closed = lock(&self.closed);
        *closed = true;
        let folders = std::mem::take(&mut *lock(&self.cleanup));
        if !folders.is_empty() {
            debug!("cleaning up {} synthesized modules", folders.len());
        }
        cleanup_folders(&*self.fs, &folders);
    }

    pub fn is_closed(&self) -> bool {
        *lock(&self.closed)
    }
}
