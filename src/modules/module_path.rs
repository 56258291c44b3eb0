//! Module path derivation for folders without a module file.

use std::path::{Path, MAIN_SEPARATOR};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::util::FileSystem;

/// `package foo // import "example.com/foo"`
static IMPORT_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^package[ \t]+[^ \t\r\n/]+[ \t]+//[ \t]+import[ \t]+("[^"]+")[ \t]*\r?\n"#)
        .expect("import comment pattern")
});

#[derive(Debug, Deserialize)]
struct GodepsManifest {
    #[serde(rename = "ImportPath", alias = "importPath", default)]
    import_path: String,
}

#[derive(Debug, Deserialize)]
struct VendorManifest {
    #[serde(rename = "rootPath", alias = "RootPath", default)]
    root_path: String,
}

/// Pick a module path for `folder`.
///
/// Tries import comments in the folder's own sources, then in its
/// immediate subdirectories, then the legacy manifests, then the checkout
/// layout of the folder path.
pub fn module_path(fs: &dyn FileSystem, folder: &Path) -> String {
    if let Some(path) = find_declared_path(fs, folder) {
        debug!("module path for {}: {}", folder.display(), path);
        return path;
    }
    checkout_module_path(folder)
}

fn find_declared_path(fs: &dyn FileSystem, folder: &Path) -> Option<String> {
    let entries = fs.read_dir(folder).unwrap_or_default();

    for entry in entries.iter().filter(|e| e.is_file && e.name.ends_with(".go")) {
        if let Some(path) = import_comment(fs, &folder.join(&entry.name)) {
            return Some(path);
        }
    }

    for dir in entries.iter().filter(|e| e.is_dir) {
        let sub = folder.join(&dir.name);
        let files = fs.read_dir(&sub).unwrap_or_default();
        for entry in files.iter().filter(|e| e.is_file && e.name.ends_with(".go")) {
            if let Some(path) = import_comment(fs, &sub.join(&entry.name)) {
                return Some(parent_import_path(&path).to_string());
            }
        }
    }

    let godeps = folder.join("Godeps").join("Godeps.json");
    if let Some(manifest) = read_json::<GodepsManifest>(fs, &godeps) {
        if !manifest.import_path.is_empty() {
            return Some(manifest.import_path);
        }
    }

    let vendor_json = folder.join("vendor").join("vendor.json");
    if let Some(manifest) = read_json::<VendorManifest>(fs, &vendor_json) {
        if !manifest.root_path.is_empty() {
            return Some(manifest.root_path);
        }
    }

    None
}

fn read_json<T: for<'de> Deserialize<'de>>(fs: &dyn FileSystem, path: &Path) -> Option<T> {
    let data = fs.read(path).ok()?;
    match serde_json::from_slice(&data) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("ignoring malformed {}: {}", path.display(), e);
            None
        }
    }
}

/// The import path named by an import comment in `file`, if any.
pub fn import_comment(fs: &dyn FileSystem, file: &Path) -> Option<String> {
    let data = fs.read(file).ok()?;
    let text = String::from_utf8_lossy(&data);
    let quoted = IMPORT_COMMENT.captures(&text)?.get(1)?.as_str();
    serde_json::from_str::<String>(quoted).ok()
}

fn parent_import_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..i],
        None => ".",
    }
}

/// Rebuild `host/owner/repo[/sub]` from a checkout path.
///
/// Checkouts live at `.../<host>/<owner>/<repo>/__<a>/<b>/<sub>...`; the
/// two segments after the marker are the checkout's own layout and are
/// dropped. Paths that don't follow this layout are returned as is.
pub fn checkout_module_path(folder: &Path) -> String {
    let folder = folder.to_string_lossy();
    let marker = format!("{MAIN_SEPARATOR}__");

    let parts: Vec<&str> = folder.split(marker.as_str()).collect();
    let [repo_dir, inner] = parts.as_slice() else {
        return folder.into_owned();
    };

    let prefix: Vec<&str> = repo_dir.split(MAIN_SEPARATOR).collect();
    if prefix.len() < 4 {
        return folder.into_owned();
    }

    let mut module_path = prefix[prefix.len() - 3..].join("/");
    let suffix: Vec<&str> = inner.split(MAIN_SEPARATOR).collect();
    for segment in suffix.iter().skip(2) {
        module_path.push('/');
        module_path.push_str(segment);
    }
    module_path
}
