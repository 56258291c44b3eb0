//! Cross-view symbol resolution.
//!
//! Turns a declaration found by the type checker into something that can be
//! looked up from another repository: a qualified name plus a package
//! locator (import path, repository URL, version).

pub mod errors;
pub mod package;
pub mod qname;
pub mod repo_root;
pub mod version;

pub use errors::ResolveError;
pub use package::PackageResolver;
pub use qname::{qualified_name, qualified_name_in};
pub use repo_root::{RepoRootResolver, VcsRepoRoots};
