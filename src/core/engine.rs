//! The type-checking engine this crate extends.
//!
//! Parsing, identifier resolution, package checking and outline
//! computation are owned by the hosting language server. Everything in
//! this crate reaches them through [`Engine`].

use std::path::{Path, PathBuf};

use anyhow::Result;
use tower_lsp::lsp_types::{DocumentSymbol, Position, Url};

use crate::core::declaration::{Identifier, Package};
use crate::core::syntax::SyntaxTree;

/// Operations consumed from the base language server.
///
/// Implementations read immutable snapshots and must be callable from
/// several threads at once.
pub trait Engine: Send + Sync + 'static {
    /// Root folder of the view that owns `uri`.
    fn view_root(&self, uri: &Url) -> Result<PathBuf>;

    /// Parse a file into a syntax tree.
    fn parse_file(&self, path: &Path) -> Result<SyntaxTree>;

    /// Resolve the identifier at `position` to its declaration.
    fn identifier_at(&self, uri: &Url, position: Position) -> Result<Identifier>;

    /// Type-check the narrowest package containing `uri`.
    fn narrowest_package(&self, uri: &Url) -> Result<Package>;

    /// Hierarchical outline of a document.
    fn document_symbols(&self, uri: &Url) -> Result<Vec<DocumentSymbol>>;
}
