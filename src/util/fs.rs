//! Filesystem access.
//!
//! The module scanner only talks to the disk through [`FileSystem`], so
//! the traversal can be exercised against an in-memory tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// A directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    /// Regular file (not a directory, symlink or device)
    pub is_file: bool,
}

/// Directory listing and file access used by the module manager.
pub trait FileSystem: Send + Sync {
    /// List a directory, sorted by name.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>>;

    /// Check whether a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or truncate a file.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Every directory below `root`, `root` included.
    ///
    /// Subdirectories whose name satisfies `prune` are not entered. The root
    /// itself is never pruned.
    fn walk_dirs(&self, root: &Path, prune: &dyn Fn(&str) -> bool) -> io::Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        let mut stack = vec![root.to_path_buf()];

        while let Some(dir) = stack.pop() {
            let entries = self.read_dir(&dir)?;
            for entry in entries.iter().rev() {
                if entry.is_dir && !prune(&entry.name) {
                    stack.push(dir.join(&entry.name));
                }
            }
            dirs.push(dir);
        }

        Ok(dirs)
    }
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let ty = entry.file_type()?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: ty.is_dir(),
                is_file: ty.is_file(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn walk_dirs(&self, root: &Path, prune: &dyn Fn(&str) -> bool) -> io::Result<Vec<PathBuf>> {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !e.file_type().is_dir() || !prune(&e.file_name().to_string_lossy())
            });

        let mut dirs = Vec::new();
        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_dir() {
                dirs.push(entry.into_path());
            }
        }
        Ok(dirs)
    }
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Check if a path is inside another path, comparing whole components.
pub fn is_inside(path: &Path, parent: &Path) -> bool {
    !parent.as_os_str().is_empty() && path.starts_with(parent)
}

/// Check if any component of `path` is literally `name`.
pub fn has_component(path: &Path, name: &str) -> bool {
    path.components().any(|c| c.as_os_str() == name)
}
