//! Folders whose dependencies are vendored or failed to download.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use crate::modules::manifest::{has_legacy_manifest, has_module_file, has_vendor_dir};
use crate::util::FileSystem;

static GLOBAL: LazyLock<Arc<VendorRegistry>> = LazyLock::new(|| Arc::new(VendorRegistry::new()));

/// Registry of folders that must not be handed to `go mod download`.
///
/// A folder lands here either because it carries a `vendor` directory
/// without any manifest, or because a download for it failed.
#[derive(Debug, Default)]
pub struct VendorRegistry {
    folders: Mutex<Vec<PathBuf>>,
}

impl VendorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every session of this process.
    pub fn global() -> Arc<VendorRegistry> {
        GLOBAL.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        self.folders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flag a folder.
    pub fn mark(&self, folder: impl Into<PathBuf>) {
        self.lock().push(folder.into());
    }

    /// Return the index of `folder` if it is flagged.
    ///
    /// Unflagged folders are registered when they have a `vendor` directory
    /// and neither a module file nor a legacy manifest.
    pub fn check_or_register(&self, fs: &dyn FileSystem, folder: &Path) -> Option<usize> {
        let mut folders = self.lock();
        if let Some(index) = folders.iter().position(|f| f == folder) {
            return Some(index);
        }
        if has_module_file(fs, folder) || has_legacy_manifest(fs, folder) {
            return None;
        }
        if has_vendor_dir(fs, folder) {
            folders.push(folder.to_path_buf());
            return Some(folders.len() - 1);
        }
        None
    }

    /// Unflag the folder at `index`. The last entry takes its slot.
    pub fn remove(&self, index: usize) {
        let mut folders = self.lock();
        if index < folders.len() {
            folders.swap_remove(index);
        }
    }

    pub fn contains(&self, folder: &Path) -> bool {
        self.lock().iter().any(|f| f == folder)
    }

    pub fn folders(&self) -> Vec<PathBuf> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
