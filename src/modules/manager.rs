//! Workspace module management.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tower_lsp::lsp_types::{Url, WorkspaceFolder};
use tracing::{debug, error, info, warn};

use crate::modules::manifest::{remove_module_files, write_module_file};
use crate::modules::module_path::module_path;
use crate::modules::scan::{find_module_roots, find_uncovered, longest_common_prefix};
use crate::modules::toolchain::GoToolchain;
use crate::modules::vendor::VendorRegistry;
use crate::util::fs::is_inside;
use crate::util::FileSystem;

/// How a module root came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleOrigin {
    /// A module file was already there.
    Existing,
    /// Created for a directory with a legacy manifest or vendor directory.
    Manifest,
    /// Created to cover sources outside any module.
    Synthetic,
}

/// A module root found or created by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRoot {
    pub path: PathBuf,
    pub origin: ModuleOrigin,
}

impl ModuleRoot {
    pub fn new(path: impl Into<PathBuf>, origin: ModuleOrigin) -> Self {
        ModuleRoot {
            path: path.into(),
            origin,
        }
    }
}

/// Makes sure every Go source in a workspace folder belongs to a module.
pub struct ModuleManager {
    install_dependencies: bool,
    fs: Arc<dyn FileSystem>,
    toolchain: Arc<dyn GoToolchain>,
    vendor: Arc<VendorRegistry>,
    module_folders: Vec<WorkspaceFolder>,
    cleanup_folders: Vec<PathBuf>,
}

impl ModuleManager {
    pub fn new(
        install_dependencies: bool,
        fs: Arc<dyn FileSystem>,
        toolchain: Arc<dyn GoToolchain>,
        vendor: Arc<VendorRegistry>,
    ) -> Self {
        ModuleManager {
            install_dependencies,
            fs,
            toolchain,
            vendor,
            module_folders: Vec::new(),
            cleanup_folders: Vec::new(),
        }
    }

    pub fn install_dependencies(&self) -> bool {
        self.install_dependencies
    }

    /// Workspace folders added for module roots so far.
    pub fn module_folders(&self) -> &[WorkspaceFolder] {
        &self.module_folders
    }

    /// Folders holding module files this manager wrote itself.
    pub fn cleanup_folders(&self) -> &[PathBuf] {
        &self.cleanup_folders
    }

    /// Hand over the recorded cleanup folders.
    pub fn take_cleanup_folders(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.cleanup_folders)
    }

    /// Find and create the module roots under `folder`.
    ///
    /// Failing to walk the tree is an error. Failures while looking for
    /// uncovered sources only drop the synthesis step, and a failed
    /// synthesis only drops that one root.
    pub fn scan(&mut self, folder: &Path) -> Result<Vec<ModuleRoot>> {
        let mut roots: Vec<ModuleRoot> = find_module_roots(&*self.fs, folder)?
            .into_iter()
            .map(|path| ModuleRoot::new(path, ModuleOrigin::Existing))
            .collect();

        let uncovered = match find_uncovered(&*self.fs, folder) {
            Ok(uncovered) => uncovered,
            Err(e) => {
                warn!("skipping module synthesis for {}: {:#}", folder.display(), anyhow!(e));
                return Ok(roots);
            }
        };

        let mut pending: Vec<ModuleRoot> = uncovered
            .manifest_dirs
            .into_iter()
            .map(|path| ModuleRoot::new(path, ModuleOrigin::Manifest))
            .collect();

        if !uncovered.source_dirs.is_empty() {
            let common = longest_common_prefix(&uncovered.source_dirs);
            if is_inside(&common, folder) {
                pending.push(ModuleRoot::new(common, ModuleOrigin::Synthetic));
            } else {
                warn!(
                    "sources under {} share no directory inside it, creating one module per directory",
                    folder.display()
                );
                pending.extend(uncovered.source_dirs.iter().map(|segments| {
                    ModuleRoot::new(segments.iter().collect::<PathBuf>(), ModuleOrigin::Synthetic)
                }));
            }
        }

        for root in pending {
            match self.create_module(&root.path) {
                Ok(()) => roots.push(root),
                Err(e) => error!("failed to create module in {}: {:#}", root.path.display(), e),
            }
        }

        Ok(roots)
    }

    /// Write a module boundary for `folder`.
    fn create_module(&mut self, folder: &Path) -> Result<()> {
        let path = module_path(&*self.fs, folder);

        if self.install_dependencies {
            info!("initializing module {} in {}", path, folder.display());
            return self.toolchain.mod_init(folder, &path);
        }

        if write_module_file(&*self.fs, folder, &path)? {
            debug!("wrote module file for {} in {}", path, folder.display());
            self.cleanup_folders.push(folder.to_path_buf());
        }
        Ok(())
    }

    /// Scan a workspace folder and record the module roots other than the
    /// folder itself. Returns the workspace folders that were new.
    pub fn run(&mut self, root: &WorkspaceFolder) -> Result<Vec<WorkspaceFolder>> {
        let dir = root
            .uri
            .to_file_path()
            .map_err(|()| anyhow!("workspace folder is not a local path: {}", root.uri))?;

        let mut added = Vec::new();
        for module in self.scan(&dir)? {
            if module.path == dir {
                continue;
            }
            let Some(folder) = workspace_folder(&module.path) else {
                continue;
            };
            if !self.module_folders.contains(&folder) {
                self.module_folders.push(folder.clone());
                added.push(folder);
            }
        }
        Ok(added)
    }

    /// Download dependencies for each folder that is not in vendor mode.
    ///
    /// A folder whose download fails is put in vendor mode.
    pub fn download_deps(&self, folders: &[WorkspaceFolder]) {
        if !self.install_dependencies {
            return;
        }

        for folder in folders {
            let Ok(dir) = folder.uri.to_file_path() else {
                continue;
            };
            if self.vendor.check_or_register(&*self.fs, &dir).is_some() {
                debug!("{} is in vendor mode, not downloading", dir.display());
                continue;
            }

            info!("downloading dependencies for {}", dir.display());
            if let Err(e) = self.toolchain.mod_download(&dir) {
                error!("{:#}", e);
                self.vendor.mark(dir);
            }
        }
    }

    /// Scan every folder, append the module roots found to `folders` and
    /// download dependencies for the result.
    pub fn manage(&mut self, folders: &mut Vec<WorkspaceFolder>) {
        let roots = folders.clone();
        for root in &roots {
            match self.run(root) {
                Ok(added) => {
                    for folder in added {
                        if !folders.contains(&folder) {
                            folders.push(folder);
                        }
                    }
                }
                Err(e) => error!("failed to scan {}: {:#}", root.uri, e),
            }
        }
        self.download_deps(folders);
    }

    /// Remove the module files this manager wrote.
    pub fn cleanup(&mut self) {
        let folders = self.take_cleanup_folders();
        cleanup_folders(&*self.fs, &folders);
    }
}

/// Remove written module files from every folder, ignoring errors.
pub fn cleanup_folders(fs: &dyn FileSystem, folders: &[PathBuf]) {
    for folder in folders {
        debug!("removing module files in {}", folder.display());
        remove_module_files(fs, folder);
    }
}

/// A workspace folder named after the directory.
pub fn workspace_folder(dir: &Path) -> Option<WorkspaceFolder> {
    let uri = Url::from_file_path(dir).ok()?;
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    Some(WorkspaceFolder { uri, name })
}
