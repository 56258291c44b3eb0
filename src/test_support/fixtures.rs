//! Test fixtures for common test scenarios.
//!
//! Syntax tree and declaration builders for the resolvers, and Go source
//! trees for the module manager.

use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tower_lsp::lsp_types::{self, DocumentSymbol, Position, SymbolKind};

use crate::core::{DeclKind, Declaration, NodeKind, Package, SyntaxNode};

/// A syntax node with children.
pub fn node(kind: NodeKind, span: Range<usize>, children: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new(kind, span).with_children(children)
}

/// An identifier node starting at `start`.
pub fn ident(name: &str, start: usize) -> SyntaxNode {
    SyntaxNode::new(NodeKind::Ident(name.to_string()), start..start + name.len())
}

/// A declaration in `/ws/app/main.go`, on the first line at `offset`.
///
/// `package` is used both as the package name and its import path.
pub fn declaration(name: &str, kind: DeclKind, package: Option<&str>, offset: usize) -> Declaration {
    Declaration {
        name: name.to_string(),
        kind,
        package: package.map(|p| Package::new(p, p)),
        file: PathBuf::from("/ws/app/main.go"),
        offset,
        range: lsp_types::Range::new(
            Position::new(0, offset as u32),
            Position::new(0, (offset + name.len()) as u32),
        ),
    }
}

/// An outline entry on a single line.
#[allow(deprecated)]
pub fn outline_symbol(name: &str, kind: SymbolKind, children: Vec<DocumentSymbol>) -> DocumentSymbol {
    let range = lsp_types::Range::new(Position::new(0, 0), Position::new(0, name.len() as u32));
    DocumentSymbol {
        name: name.to_string(),
        detail: None,
        kind,
        tags: None,
        deprecated: None,
        range,
        selection_range: range,
        children: if children.is_empty() { None } else { Some(children) },
    }
}

/// Fixture for a folder of Go sources.
#[derive(Debug, Clone, Default)]
pub struct GoTreeFixture {
    /// Files (path relative to the folder -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl GoTreeFixture {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add any file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Add a module file declaring `module_path` in `dir`.
    pub fn with_module(self, dir: &str, module_path: &str) -> Self {
        self.with_file(Path::new(dir).join("go.mod"), format!("module {}\n", module_path))
    }

    /// Add a source file for package `name` in `dir`.
    pub fn with_package(self, dir: &str, name: &str) -> Self {
        let file = Path::new(dir).join(format!("{}.go", name));
        self.with_file(file, sources::package(name))
    }

    /// Write this fixture to a real directory.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<()> {
        for (rel_path, content) in &self.files {
            let full_path = base_path.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }
        Ok(())
    }

    /// Write this fixture to a MockFileSystem.
    pub fn write_to_mock(&self, fs: &super::MockFileSystem, base_path: &Path) {
        fs.add_dir(base_path);
        for (rel_path, content) in &self.files {
            fs.add_file(base_path.join(rel_path), content.as_bytes());
        }
    }
}

/// Go source snippets.
pub mod sources {
    /// A package clause with a trivial function.
    pub fn package(name: &str) -> String {
        format!("package {name}\n\nfunc Hello() string {{\n\treturn \"hello\"\n}}\n")
    }

    /// A package clause carrying an import comment.
    pub fn with_import_comment(name: &str, import_path: &str) -> String {
        format!("package {name} // import \"{import_path}\"\n\nfunc Hello() {{}}\n")
    }

    /// A test file, which never makes a directory a source directory.
    pub fn test_file(name: &str) -> String {
        format!("package {name}\n\nimport \"testing\"\n\nfunc TestHello(t *testing.T) {{}}\n")
    }
}

/// Legacy dependency manifests.
pub mod manifests {
    /// A Godeps/Godeps.json declaring `import_path`.
    pub fn godeps(import_path: &str) -> String {
        format!("{{\n\t\"ImportPath\": \"{import_path}\",\n\t\"GoVersion\": \"go1.8\",\n\t\"Deps\": []\n}}\n")
    }

    /// A govendor vendor/vendor.json declaring `root_path`.
    pub fn govendor(root_path: &str) -> String {
        format!("{{\n\t\"comment\": \"\",\n\t\"package\": [],\n\t\"rootPath\": \"{root_path}\"\n}}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockFileSystem;
    use crate::util::FileSystem;

    #[test]
    fn test_ident_span() {
        let id = ident("Server", 5);
        assert_eq!(id.span, 5..11);
        assert!(id.children.is_empty());
    }

    #[test]
    fn test_declaration_range() {
        let decl = declaration("Wrap", DeclKind::Func { has_receiver: false }, Some("errors"), 12);
        assert_eq!(decl.range.start, Position::new(0, 12));
        assert_eq!(decl.range.end, Position::new(0, 16));
        assert_eq!(decl.package.unwrap().name, "errors");
    }

    #[test]
    fn test_go_tree_write_to_mock() {
        let fs = MockFileSystem::new();
        GoTreeFixture::new()
            .with_module("svc", "example.com/svc")
            .with_package("svc/api", "api")
            .write_to_mock(&fs, Path::new("/ws"));

        assert!(fs.exists(Path::new("/ws/svc/go.mod")));
        assert!(fs.read_to_string(Path::new("/ws/svc/api/api.go")).unwrap().starts_with("package api"));
    }

    #[test]
    fn test_go_tree_write_to() {
        let tmp = tempfile::TempDir::new().unwrap();
        GoTreeFixture::new()
            .with_file("Godeps/Godeps.json", manifests::godeps("github.com/acme/old"))
            .with_file("main.go", sources::with_import_comment("main", "github.com/acme/old"))
            .write_to(tmp.path())
            .unwrap();

        assert!(tmp.path().join("Godeps/Godeps.json").is_file());
        assert!(tmp.path().join("main.go").is_file());
    }
}
