//! xrepo - cross-repository code intelligence for the Go language server
//!
//! This crate extends a base Go language server with:
//! - `textDocument/edefinition`, a definition lookup that can point into
//!   another repository by qualified name and package locator
//! - `textDocument/full`, every symbol of a document with qualified names
//! - workspace module management, which makes sure every Go source in a
//!   workspace folder belongs to a module before it is type-checked

pub mod core;
pub mod modules;
pub mod ops;
pub mod resolver;
pub mod server;
pub mod util;

/// Test utilities and mocks for xrepo unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations for the filesystem, the
/// go command and the base language server.
#[cfg(test)]
pub mod test_support;

pub use core::{Engine, PackageLocator, SymbolLocator};
pub use modules::{ModuleManager, VendorRegistry};
pub use ops::{ExtendedHandlers, Extensions};
pub use resolver::{PackageResolver, ResolveError};
pub use server::{ExtendedServer, Session};
pub use util::{Config, GoEnv};
