//! Resolution error types.

use thiserror::Error;

/// Error raised while answering an extended request.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no identifier found at {uri}:{line}:{character}: {reason}")]
    Unresolved {
        uri: String,
        line: u32,
        character: u32,
        reason: String,
    },

    #[error("no corresponding symbol kind for '{name}'")]
    NoSymbolKind { name: String },

    #[error("no proper and efficient way to look up the revision of `{path}`")]
    UnsupportedVersionLookup { path: String },

    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}
