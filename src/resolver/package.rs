//! Package locators.

use std::path::Path;
use std::sync::Arc;

use crate::core::{Package, PackageLocator};
use crate::resolver::repo_root::RepoRootResolver;
use crate::resolver::version::resolve_version;
use crate::util::fs::is_inside;
use crate::util::GoEnv;

/// Computes the locator of the package that declares a symbol.
#[derive(Clone)]
pub struct PackageResolver {
    env: GoEnv,
    repo_roots: Arc<dyn RepoRootResolver>,
}

impl PackageResolver {
    /// Create a resolver.
    pub fn new(env: GoEnv, repo_roots: Arc<dyn RepoRootResolver>) -> Self {
        PackageResolver { env, repo_roots }
    }

    /// Get the Go environment.
    pub fn env(&self) -> &GoEnv {
        &self.env
    }

    /// Build the locator for `pkg`, whose declaration lives in `file`.
    ///
    /// Packages inside the workspace or the standard library are identified
    /// by import path alone. Everything else gets a version, when one can be
    /// read off the module cache, and its canonical repository URL.
    pub fn locate(&self, pkg: Option<&Package>, workspace_root: &Path, file: &Path) -> PackageLocator {
        let Some(pkg) = pkg else {
            return PackageLocator::default();
        };

        let mut locator = PackageLocator {
            name: pkg.name.clone(),
            repo_uri: pkg.path.clone(),
            version: String::new(),
        };

        if is_inside(file, workspace_root) || self.env.is_stdlib(file) {
            return locator;
        }

        if let Some(version) = resolve_version(self.env.mod_cache(), file) {
            locator.version = version;
        }

        match self.repo_roots.repo_root(&pkg.path) {
            Ok(repo) => locator.repo_uri = repo,
            Err(e) => tracing::debug!("keeping import path for `{}`: {:#}", pkg.path, e),
        }

        locator
    }
}

impl std::fmt::Debug for PackageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageResolver")
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}
