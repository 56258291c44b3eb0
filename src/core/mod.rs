//! Core data structures.
//!
//! This module contains the types shared by the resolution handlers and the
//! language server adapter:
//! - Declarations and packages produced by the type checker
//! - Syntax trees used for scope walking
//! - Symbol and package locators returned to clients

pub mod declaration;
pub mod engine;
pub mod locator;
pub mod symbol;
pub mod syntax;

pub use declaration::{BasicInfo, DeclKind, Declaration, Identifier, Package, Underlying};
pub use engine::Engine;
pub use locator::{DetailSymbol, FullParams, FullResponse, PackageLocator, Reference, SymbolLocator};
pub use symbol::classify;
pub use syntax::{NodeKind, Receiver, SyntaxNode, SyntaxTree};
