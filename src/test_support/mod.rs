//! Test utilities and mocks for xrepo unit tests.
//!
//! Mock implementations of the seams the crate talks through: the
//! filesystem, the go command and the base language server.
//!
//! # Example
//!
//! ```rust,ignore
//! use xrepo::test_support::{MockExecutor, MockFileSystem};
//!
//! #[test]
//! fn test_example() {
//!     let fs = MockFileSystem::new();
//!     fs.add_file("/ws/app/main.go", "package main\n");
//!
//!     let exec = MockExecutor::new();
//!     exec.fail_on("/ws/app: go mod download");
//!
//!     // Hand both to a ModuleManager...
//! }
//! ```

pub mod fixtures;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};
use tower_lsp::lsp_types::{DocumentSymbol, Position, Url};

use crate::core::{Declaration, Engine, Identifier, Package, SyntaxTree};
use crate::modules::GoToolchain;
use crate::util::fs::DirEntry;
use crate::util::FileSystem;

// Re-export fixtures for convenience
pub use fixtures::*;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Default)]
struct FsState {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
}

impl FsState {
    fn add_dir(&mut self, path: &Path) {
        let mut current = Some(path);
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(dir.to_path_buf());
            current = dir.parent();
        }
    }
}

/// Mock filesystem for testing without real I/O.
///
/// An in-memory tree. Adding a file creates its parent directories.
#[derive(Debug, Default)]
pub struct MockFileSystem {
    state: Mutex<FsState>,
}

impl MockFileSystem {
    /// Create a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut state = lock(&self.state);
        if let Some(parent) = path.parent() {
            state.add_dir(parent);
        }
        state.files.insert(path.to_path_buf(), content.into());
    }

    /// Add a directory and its parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        lock(&self.state).add_dir(path.as_ref());
    }

    /// Make listing `path` fail.
    pub fn fail_read_dir(&self, path: impl AsRef<Path>) {
        lock(&self.state)
            .unreadable
            .insert(path.as_ref().to_path_buf());
    }

    /// Read a file as a string.
    pub fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| anyhow!("invalid UTF-8: {}", e))
    }

    /// Check if a path is a file.
    pub fn is_file(&self, path: &Path) -> bool {
        lock(&self.state).files.contains_key(path)
    }

    /// Check if a path is a directory.
    pub fn is_dir(&self, path: &Path) -> bool {
        lock(&self.state).dirs.contains(path)
    }
}

impl FileSystem for MockFileSystem {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        let state = lock(&self.state);
        if state.unreadable.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", dir.display()),
            ));
        }
        if !state.dirs.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {}", dir.display()),
            ));
        }

        let name_of = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned());
        let mut entries: Vec<DirEntry> = state
            .dirs
            .iter()
            .filter(|d| d.parent() == Some(dir))
            .filter_map(|d| name_of(d))
            .map(|name| DirEntry {
                name,
                is_dir: true,
                is_file: false,
            })
            .chain(
                state
                    .files
                    .keys()
                    .filter(|f| f.parent() == Some(dir))
                    .filter_map(|f| name_of(f))
                    .map(|name| DirEntry {
                        name,
                        is_dir: false,
                        is_file: true,
                    }),
            )
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        let state = lock(&self.state);
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        lock(&self.state).files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = lock(&self.state);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !state.dirs.contains(parent) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("parent directory does not exist: {}", parent.display()),
                ));
            }
        }
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        match lock(&self.state).files.remove(path) {
            Some(_) => Ok(()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )),
        }
    }
}

/// Mock go command.
///
/// Records every invocation as `"<folder>: go <args>"` and succeeds unless
/// the invocation starts with a registered failure prefix.
#[derive(Debug, Default)]
pub struct MockExecutor {
    calls: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every invocation starting with `prefix`.
    pub fn fail_on(&self, prefix: &str) -> &Self {
        lock(&self.failures).push(prefix.to_string());
        self
    }

    /// Get all invocations so far.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Clear all recorded calls.
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn run(&self, folder: &Path, args: &str) -> Result<()> {
        let call = format!("{}: go {}", folder.display(), args);
        lock(&self.calls).push(call.clone());

        if lock(&self.failures).iter().any(|p| call.starts_with(p.as_str())) {
            bail!("`go {}` failed in {}", args, folder.display());
        }
        Ok(())
    }
}

impl GoToolchain for MockExecutor {
    fn mod_init(&self, folder: &Path, module_path: &str) -> Result<()> {
        self.run(folder, &format!("mod init {}", module_path))
    }

    fn mod_download(&self, folder: &Path) -> Result<()> {
        self.run(folder, "mod download")
    }
}

/// Mock base language server.
///
/// Every position resolves to the identifier set last. Parsing only knows
/// the trees added with [`MockEngine::add_tree`].
#[derive(Debug, Default)]
pub struct MockEngine {
    view_root: Option<PathBuf>,
    identifier: Mutex<Option<Identifier>>,
    trees: Mutex<HashMap<PathBuf, SyntaxTree>>,
    package: Mutex<Option<Package>>,
    outline: Mutex<Vec<DocumentSymbol>>,
    parsed: Mutex<Vec<PathBuf>>,
    checks: AtomicUsize,
}

impl MockEngine {
    /// Create an engine with no view and no knowledge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put every document in the view rooted at `root`.
    pub fn with_view_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.view_root = Some(root.into());
        self
    }

    /// Resolve every position to `name`, declared by `declaration`.
    pub fn set_identifier(&self, name: &str, declaration: Declaration) {
        *lock(&self.identifier) = Some(Identifier {
            name: name.to_string(),
            declaration,
        });
    }

    /// Register the syntax tree of a file.
    pub fn add_tree(&self, path: &Path, tree: SyntaxTree) {
        lock(&self.trees).insert(path.to_path_buf(), tree);
    }

    /// Package returned for every document.
    pub fn set_package(&self, package: Package) {
        *lock(&self.package) = Some(package);
    }

    /// Outline returned for every document.
    pub fn set_outline(&self, outline: Vec<DocumentSymbol>) {
        *lock(&self.outline) = outline;
    }

    /// Files parsed so far, in order.
    pub fn parsed_files(&self) -> Vec<PathBuf> {
        lock(&self.parsed).clone()
    }

    /// Number of calls that needed type information.
    pub fn check_count(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

impl Engine for MockEngine {
    fn view_root(&self, uri: &Url) -> Result<PathBuf> {
        self.view_root
            .clone()
            .ok_or_else(|| anyhow!("no view for {}", uri))
    }

    fn parse_file(&self, path: &Path) -> Result<SyntaxTree> {
        lock(&self.parsed).push(path.to_path_buf());
        lock(&self.trees)
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("cannot parse {}", path.display()))
    }

    fn identifier_at(&self, uri: &Url, position: Position) -> Result<Identifier> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        lock(&self.identifier).clone().ok_or_else(|| {
            anyhow!(
                "no identifier at {}:{}:{}",
                uri,
                position.line,
                position.character
            )
        })
    }

    fn narrowest_package(&self, uri: &Url) -> Result<Package> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        lock(&self.package)
            .clone()
            .ok_or_else(|| anyhow!("no package for {}", uri))
    }

    fn document_symbols(&self, _uri: &Url) -> Result<Vec<DocumentSymbol>> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.outline).clone())
    }
}

/// Assertion helpers for testing.
pub mod assertions {
    use super::*;

    /// Assert that a path exists in the mock filesystem.
    pub fn assert_path_exists(fs: &MockFileSystem, path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(
            fs.exists(path),
            "expected path to exist: {}",
            path.display()
        );
    }

    /// Assert that a file contains specific content.
    pub fn assert_file_contains(fs: &MockFileSystem, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        let actual = fs
            .read_to_string(path)
            .unwrap_or_else(|_| panic!("file not found: {}", path.display()));
        assert!(
            actual.contains(content),
            "file {} does not contain '{}'\nactual content:\n{}",
            path.display(),
            content,
            actual
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_filesystem_basic() {
        let fs = MockFileSystem::new();

        fs.add_dir("/project");
        fs.add_file("/project/go.mod", "module example.com/project");

        assert!(fs.exists(Path::new("/project")));
        assert!(fs.exists(Path::new("/project/go.mod")));
        assert!(!fs.exists(Path::new("/project/nonexistent")));

        let content = fs.read_to_string(Path::new("/project/go.mod")).unwrap();
        assert!(content.contains("example.com/project"));
    }

    #[test]
    fn test_mock_filesystem_directories() {
        let fs = MockFileSystem::new();

        fs.add_file("/a/b/c/x.go", "package c");
        assert!(fs.is_dir(Path::new("/a")));
        assert!(fs.is_dir(Path::new("/a/b")));
        assert!(fs.is_file(Path::new("/a/b/c/x.go")));

        let names: Vec<_> = fs
            .read_dir(Path::new("/a/b/c"))
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["x.go"]);
    }

    #[test]
    fn test_mock_filesystem_walk() {
        let fs = MockFileSystem::new();
        fs.add_file("/ws/b/x.go", "");
        fs.add_file("/ws/a/c/y.go", "");

        let dirs = fs.walk_dirs(Path::new("/ws"), &|_| false).unwrap();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/ws"),
                PathBuf::from("/ws/a"),
                PathBuf::from("/ws/a/c"),
                PathBuf::from("/ws/b"),
            ]
        );
    }

    #[test]
    fn test_mock_filesystem_write_needs_parent() {
        let fs = MockFileSystem::new();
        assert!(fs.write(Path::new("/nowhere/go.mod"), b"").is_err());

        fs.add_dir("/ws");
        fs.write(Path::new("/ws/go.mod"), b"module ws").unwrap();
        fs.remove_file(Path::new("/ws/go.mod")).unwrap();
        assert!(fs.remove_file(Path::new("/ws/go.mod")).is_err());
    }

    #[test]
    fn test_mock_executor() {
        let exec = MockExecutor::new();
        exec.fail_on("/bad");

        assert!(exec.mod_init(Path::new("/ok"), "example.com/ok").is_ok());
        assert!(exec.mod_download(Path::new("/bad")).is_err());
        assert_eq!(
            exec.calls(),
            vec!["/ok: go mod init example.com/ok", "/bad: go mod download"]
        );
    }

    #[test]
    fn test_mock_engine_counts_checks() {
        let engine = MockEngine::new();
        let uri = Url::parse("file:///ws/a.go").unwrap();

        assert!(engine.view_root(&uri).is_err());
        assert!(engine.narrowest_package(&uri).is_err());
        assert!(engine.document_symbols(&uri).unwrap().is_empty());
        assert_eq!(engine.check_count(), 2);
    }

    #[test]
    fn test_assertions() {
        use assertions::*;

        let fs = MockFileSystem::new();
        fs.add_file("/ws/go.mod", "module ws\n");
        assert_path_exists(&fs, "/ws");
        assert_file_contains(&fs, "/ws/go.mod", "module ws");
    }
}
