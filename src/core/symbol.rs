//! Symbol classification.

use tower_lsp::lsp_types::SymbolKind;

use crate::core::declaration::{BasicInfo, DeclKind, Underlying};

/// Map a declaration onto a symbol kind.
///
/// Returns `None` for shapes that have no counterpart, e.g. a named map or
/// channel type. Callers decide whether that is an error.
pub fn classify(kind: &DeclKind) -> Option<SymbolKind> {
    match kind {
        DeclKind::Const => Some(SymbolKind::CONSTANT),
        DeclKind::Var { is_field: true } => Some(SymbolKind::FIELD),
        DeclKind::Var { is_field: false } => Some(SymbolKind::VARIABLE),
        DeclKind::Nil => Some(SymbolKind::NULL),
        DeclKind::PkgName => Some(SymbolKind::PACKAGE),
        DeclKind::Func { has_receiver: false } => Some(SymbolKind::FUNCTION),
        DeclKind::Func { has_receiver: true } => Some(SymbolKind::METHOD),
        DeclKind::TypeName(underlying) => classify_type(underlying),
        DeclKind::Label | DeclKind::Builtin => None,
    }
}

fn classify_type(underlying: &Underlying) -> Option<SymbolKind> {
    match underlying {
        Underlying::Struct => Some(SymbolKind::STRUCT),
        Underlying::Interface => Some(SymbolKind::INTERFACE),
        Underlying::Slice | Underlying::Array => Some(SymbolKind::ARRAY),
        Underlying::Basic(BasicInfo::Numeric) => Some(SymbolKind::NUMBER),
        Underlying::Basic(BasicInfo::Boolean) => Some(SymbolKind::BOOLEAN),
        Underlying::Basic(BasicInfo::String) => Some(SymbolKind::STRING),
        _ => None,
    }
}
