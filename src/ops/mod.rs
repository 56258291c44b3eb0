//! Extended resolution handlers.
//!
//! [`ExtendedHandlers`] is the capability the extension adds on top of a
//! base language server. [`Extensions`] implements it by decorating the
//! base [`Engine`]; everything it does not handle stays with the engine.

pub mod edefinition;
pub mod full;

use std::sync::Arc;

use tower_lsp::lsp_types::TextDocumentPositionParams;

use crate::core::{Engine, FullParams, FullResponse, SymbolLocator};
use crate::resolver::{PackageResolver, ResolveError};

pub use edefinition::edefinition;
pub use full::{flatten_symbols, full};

/// Requests served by the extension.
pub trait ExtendedHandlers: Send + Sync {
    /// Definition lookup that can leave the current view.
    fn edefinition(&self, params: &TextDocumentPositionParams) -> Result<Vec<SymbolLocator>, ResolveError>;

    /// All symbols of a document with qualified names and package locators.
    fn full(&self, params: &FullParams) -> Result<FullResponse, ResolveError>;
}

/// Extended handlers layered over a base engine.
pub struct Extensions<E> {
    engine: Arc<E>,
    packages: PackageResolver,
}

impl<E: Engine> Extensions<E> {
    /// Wrap a base engine.
    pub fn new(engine: Arc<E>, packages: PackageResolver) -> Self {
        Extensions { engine, packages }
    }

    /// Get the base engine.
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Get the package resolver.
    pub fn packages(&self) -> &PackageResolver {
        &self.packages
    }
}

impl<E: Engine> ExtendedHandlers for Extensions<E> {
    fn edefinition(&self, params: &TextDocumentPositionParams) -> Result<Vec<SymbolLocator>, ResolveError> {
        edefinition(self.engine.as_ref(), &self.packages, params)
    }

    fn full(&self, params: &FullParams) -> Result<FullResponse, ResolveError> {
        full(self.engine.as_ref(), &self.packages, params)
    }
}
