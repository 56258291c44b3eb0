//! Qualified names.
//!
//! A qualified name identifies a declaration inside its package:
//!
//! ```text
//! qname = package.name + struct.name* + function.name* | (struct.name + method.name)* + struct.name* + symbol.name
//! ```
//!
//! It is built by walking the syntax nodes enclosing the declaration from
//! the inside out. Qualified names are only unique within a package, so they
//! always travel together with a [`PackageLocator`](crate::core::PackageLocator).

use tower_lsp::lsp_types::SymbolKind;

use crate::core::{Declaration, Engine, NodeKind, SyntaxNode, SyntaxTree};

/// Compute the qualified name of a declaration.
///
/// Package names short-circuit to their bare name. If the declaring file
/// cannot be parsed the result is empty.
pub fn qualified_name<E: Engine + ?Sized>(engine: &E, decl: &Declaration, kind: SymbolKind) -> String {
    if kind == SymbolKind::PACKAGE {
        return decl.name.clone();
    }

    let tree = match engine.parse_file(&decl.file) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::debug!("cannot parse {}: {:#}", decl.file.display(), e);
            return String::new();
        }
    };

    qualified_name_in(&tree, decl)
}

/// Compute the qualified name of a declaration within an already parsed file.
pub fn qualified_name_in(tree: &SyntaxTree, decl: &Declaration) -> String {
    let path = tree.path_enclosing(decl.offset);
    let mut qname = decl.name.clone();

    // The first node is the declaring identifier itself.
    for (i, node) in path.iter().enumerate().skip(1) {
        let parent = path.get(i + 1).copied();
        if let Some(scope) = scope_name(node, parent) {
            qname = format!("{}.{}", scope, qname);
        }
    }

    match &decl.package {
        Some(pkg) => format!("{}.{}", pkg.name, qname),
        None => qname,
    }
}

/// Name contributed by `node` to the qualified name, if any.
fn scope_name<'a>(node: &'a SyntaxNode, parent: Option<&'a SyntaxNode>) -> Option<&'a str> {
    match &node.kind {
        NodeKind::StructType => match parent.map(|p| &p.kind) {
            Some(NodeKind::TypeSpec { name }) => Some(name),
            // Several names sharing one anonymous struct collapse to the first.
            Some(NodeKind::Field { names }) | Some(NodeKind::ValueSpec { names }) => {
                names.first().map(String::as_str)
            }
            _ => None,
        },
        NodeKind::InterfaceType => match parent.map(|p| &p.kind) {
            Some(NodeKind::TypeSpec { name }) => Some(name),
            _ => None,
        },
        NodeKind::FuncDecl {
            receiver: Some(receiver),
        } => Some(receiver.base_name()),
        _ => None,
    }
}
