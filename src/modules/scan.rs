//! Folder tree scanning.
//!
//! Two passes over a workspace folder: one collects the directories that
//! already are module roots, the other collects what still needs a module
//! boundary.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::modules::manifest::{
    has_legacy_manifest, has_module_file, has_vendor_dir, VENDOR_DIR,
};
use crate::util::fs::DirEntry;
use crate::util::FileSystem;

/// Errors raised while scanning a folder tree.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk {}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Directories below a folder that are not covered by any module yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UncoveredScan {
    /// Directories with a legacy manifest or a vendor directory. Each one
    /// becomes a module root of its own.
    pub manifest_dirs: Vec<PathBuf>,
    /// Directories holding Go sources, as path segment sequences.
    pub source_dirs: Vec<Vec<String>>,
}

impl UncoveredScan {
    pub fn is_empty(&self) -> bool {
        self.manifest_dirs.is_empty() && self.source_dirs.is_empty()
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn is_source_file(entry: &DirEntry) -> bool {
    entry.is_file && entry.name.ends_with(".go") && !entry.name.ends_with("_test.go")
}

/// Every directory under `root` that holds a module file.
///
/// Hidden directories and vendor directories are not entered.
pub fn find_module_roots(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let prune = |name: &str| is_hidden(name) || name == VENDOR_DIR;
    let dirs = fs.walk_dirs(root, &prune).map_err(|source| ScanError::Walk {
        root: root.to_path_buf(),
        source,
    })?;

    Ok(dirs
        .into_iter()
        .filter(|dir| has_module_file(fs, dir))
        .collect())
}

/// Collect the directories under `root` not covered by a module.
///
/// Descent stops at module roots and at manifest directories. Any read
/// error fails the whole scan.
pub fn find_uncovered(fs: &dyn FileSystem, root: &Path) -> Result<UncoveredScan, ScanError> {
    let mut scan = UncoveredScan::default();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        if has_module_file(fs, &dir) {
            continue;
        }
        if has_legacy_manifest(fs, &dir) || has_vendor_dir(fs, &dir) {
            scan.manifest_dirs.push(dir);
            continue;
        }

        let entries = fs.read_dir(&dir).map_err(|source| ScanError::ReadDir {
            path: dir.clone(),
            source,
        })?;

        for entry in entries.iter().rev() {
            if entry.is_dir && !is_hidden(&entry.name) {
                stack.push(dir.join(&entry.name));
            }
        }
        if entries.iter().any(is_source_file) {
            scan.source_dirs.push(path_segments(&dir));
        }
    }

    Ok(scan)
}

/// Split a path into its segments, the root included.
pub fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}

/// The longest segment prefix shared by all `dirs`.
///
/// Falls back to the filesystem root when nothing is shared.
pub fn longest_common_prefix(dirs: &[Vec<String>]) -> PathBuf {
    let Some((first, rest)) = dirs.split_first() else {
        return root_dir();
    };

    let mut len = first.len();
    for dir in rest {
        len = len.min(
            first
                .iter()
                .zip(dir)
                .take_while(|(a, b)| a == b)
                .count(),
        );
    }

    if len == 0 {
        return root_dir();
    }
    first[..len].iter().collect()
}

fn root_dir() -> PathBuf {
    PathBuf::from(std::path::MAIN_SEPARATOR_STR)
}
