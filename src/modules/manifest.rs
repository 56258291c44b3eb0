//! Module boundary and legacy manifest files.

use std::io;
use std::path::Path;

use crate::util::FileSystem;

/// File that marks a module root.
pub const MODULE_FILE: &str = "go.mod";

/// Checksum file written next to [`MODULE_FILE`] by the go command.
pub const SUM_FILE: &str = "go.sum";

/// Directory holding vendored dependencies.
pub const VENDOR_DIR: &str = "vendor";

/// Dependency manifests of the tools that predate modules.
pub const LEGACY_MANIFESTS: &[&str] = &[
    "GLOCKFILE",
    "Godeps/Godeps.json",
    "Gopkg.lock",
    "dependencies.tsv",
    "glide.lock",
    "vendor.conf",
    "vendor.yml",
    "vendor/manifest",
    "vendor/vendor.json",
];

/// Check whether `dir` already is a module root.
pub fn has_module_file(fs: &dyn FileSystem, dir: &Path) -> bool {
    fs.exists(&dir.join(MODULE_FILE))
}

/// Check whether `dir` carries any legacy dependency manifest.
pub fn has_legacy_manifest(fs: &dyn FileSystem, dir: &Path) -> bool {
    LEGACY_MANIFESTS
        .iter()
        .any(|name| fs.exists(&dir.join(name)))
}

/// Check whether `dir` has a vendor directory.
pub fn has_vendor_dir(fs: &dyn FileSystem, dir: &Path) -> bool {
    fs.exists(&dir.join(VENDOR_DIR))
}

/// Write a minimal module file declaring `module_path`.
///
/// Returns `false` without touching anything if the file already exists.
pub fn write_module_file(fs: &dyn FileSystem, dir: &Path, module_path: &str) -> io::Result<bool> {
    let path = dir.join(MODULE_FILE);
    if fs.exists(&path) {
        return Ok(false);
    }
    fs.write(&path, format!("module {}", module_path).as_bytes())?;
    Ok(true)
}

/// Remove module files written for a folder. Errors are ignored.
pub fn remove_module_files(fs: &dyn FileSystem, dir: &Path) {
    for name in [MODULE_FILE, SUM_FILE] {
        let path = dir.join(name);
        if fs.exists(&path) {
            let _ = fs.remove_file(&path);
        }
    }
}
