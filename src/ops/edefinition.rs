//! Implementation of `textDocument/edefinition`.

use anyhow::anyhow;
use tower_lsp::lsp_types::{Location, TextDocumentPositionParams, Url};

use crate::core::{classify, Engine, SymbolLocator};
use crate::resolver::{qualified_name, PackageResolver, ResolveError};
use crate::util::fs::is_inside;

/// Resolve the definition under the cursor.
///
/// Definitions inside the requester's view come back as a plain location.
/// Definitions elsewhere come back as a qualified name, symbol kind and
/// package locator, without a location.
pub fn edefinition<E: Engine + ?Sized>(
    engine: &E,
    packages: &PackageResolver,
    params: &TextDocumentPositionParams,
) -> Result<Vec<SymbolLocator>, ResolveError> {
    let uri = &params.text_document.uri;
    let position = params.position;

    let unresolved = |e: anyhow::Error| ResolveError::Unresolved {
        uri: uri.to_string(),
        line: position.line,
        character: position.character,
        reason: format!("{:#}", e),
    };

    // Without a view there is nothing to resolve against.
    let view_root = engine.view_root(uri).map_err(unresolved)?;
    let ident = engine.identifier_at(uri, position).map_err(unresolved)?;
    let decl = &ident.declaration;

    if is_inside(&decl.file, &view_root) {
        let decl_uri = Url::from_file_path(&decl.file)
            .map_err(|_| anyhow!("not an absolute path: {}", decl.file.display()))?;
        return Ok(vec![SymbolLocator::same_view(Location::new(decl_uri, decl.range))]);
    }

    let kind = classify(&decl.kind).ok_or_else(|| ResolveError::NoSymbolKind {
        name: ident.name.clone(),
    })?;
    let qname = qualified_name(engine, decl, kind);
    let package = packages.locate(decl.package.as_ref(), &view_root, &decl.file);

    tracing::debug!("cross-view jump to {} ({})", qname, package.repo_uri);
    Ok(vec![SymbolLocator::cross_view(qname, kind, package)])
}
