//! Resolved declarations as handed over by the type checker.

use std::path::{Path, PathBuf};

use tower_lsp::lsp_types::Range;

/// A type-checked package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Package {
    /// Package name as written in the `package` clause
    pub name: String,

    /// Full import path
    pub path: String,
}

impl Package {
    /// Create a new package.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Classification of a basic (predeclared) type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicInfo {
    Numeric,
    Boolean,
    String,
    UnsafePointer,
    UntypedNil,
}

/// The underlying shape of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Underlying {
    Struct,
    Interface,
    Slice,
    Array,
    Basic(BasicInfo),
    Map,
    Chan,
    Pointer,
    Signature,
}

/// What a declaration declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Var { is_field: bool },
    Nil,
    PkgName,
    Func { has_receiver: bool },
    TypeName(Underlying),
    Label,
    Builtin,
}

/// A declaration object with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Declared identifier
    pub name: String,

    /// Kind of object declared
    pub kind: DeclKind,

    /// Declaring package; `None` for universe-scope objects
    pub package: Option<Package>,

    /// Absolute path of the declaring file
    pub file: PathBuf,

    /// Byte offset of the declaring identifier within `file`
    pub offset: usize,

    /// Source range of the declaring identifier
    pub range: Range,
}

impl Declaration {
    /// Get the declaring file.
    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// The identifier under a cursor together with what it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// Identifier as written at the use site
    pub name: String,

    /// The declaration it refers to
    pub declaration: Declaration,
}
