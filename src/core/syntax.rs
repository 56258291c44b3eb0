//! Syntax trees for qualified-name computation.
//!
//! The parser lives outside this crate; it hands over an owned tree whose
//! nodes carry only what scope walking needs: the node kind, the names it
//! declares and its byte span.

use std::ops::Range;

/// Receiver of a method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    /// `func (t T) M()`
    Named(String),
    /// `func (t *T) M()`
    Pointer(String),
}

impl Receiver {
    /// Base type name, with any pointer stripped.
    pub fn base_name(&self) -> &str {
        match self {
            Receiver::Named(name) | Receiver::Pointer(name) => name,
        }
    }
}

/// Kind of a syntax node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    GenDecl,
    /// `type Name ...`
    TypeSpec { name: String },
    /// `var a, b T` / `const a = ...`
    ValueSpec { names: Vec<String> },
    /// Struct field, parameter or named result
    Field { names: Vec<String> },
    FieldList,
    StructType,
    InterfaceType,
    FuncDecl { receiver: Option<Receiver> },
    FuncType,
    BlockStmt,
    Ident(String),
    Other,
}

/// A node in the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Range<usize>,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create a leaf node.
    pub fn new(kind: NodeKind, span: Range<usize>) -> Self {
        SyntaxNode {
            kind,
            span,
            children: Vec::new(),
        }
    }

    /// Attach children.
    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    fn contains(&self, offset: usize) -> bool {
        self.span.start <= offset && offset < self.span.end
    }
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: SyntaxNode,
}

impl SyntaxTree {
    /// Wrap a root node.
    pub fn new(root: SyntaxNode) -> Self {
        SyntaxTree { root }
    }

    /// Get the root node.
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Nodes enclosing `offset`, innermost first and the root last.
    ///
    /// Empty when the offset lies outside the file.
    pub fn path_enclosing(&self, offset: usize) -> Vec<&SyntaxNode> {
        let mut path = Vec::new();
        if !self.root.contains(offset) {
            return path;
        }

        let mut current = &self.root;
        loop {
            path.push(current);
            match current.children.iter().find(|c| c.contains(offset)) {
                Some(child) => current = child,
                None => break,
            }
        }

        path.reverse();
        path
    }
}
