//! Implementation of `textDocument/full`.

use anyhow::anyhow;
use tower_lsp::lsp_types::{DocumentSymbol, Location, SymbolInformation, Url};

use crate::core::{DetailSymbol, Engine, FullParams, FullResponse, PackageLocator};
use crate::modules::manifest::VENDOR_DIR;
use crate::resolver::{PackageResolver, ResolveError};
use crate::util::fs::has_component;

/// Collect every symbol defined in a document, with qualified names.
///
/// Documents inside a vendored tree yield an empty response without
/// consulting the type checker. References are never collected.
pub fn full<E: Engine + ?Sized>(
    engine: &E,
    packages: &PackageResolver,
    params: &FullParams,
) -> Result<FullResponse, ResolveError> {
    let mut response = FullResponse::default();
    let uri = &params.text_document.uri;
    let path = uri
        .to_file_path()
        .map_err(|_| anyhow!("not a file URI: {}", uri))?;

    // TODO: serve vendored packages once views can be created for them.
    if has_component(&path, VENDOR_DIR) {
        return Ok(response);
    }

    let view_root = engine.view_root(uri)?;
    let pkg = engine.narrowest_package(uri)?;
    let locator = packages.locate(Some(&pkg), &view_root, &path);

    let outline = engine.document_symbols(uri)?;
    response.symbols = flatten_symbols(uri, &outline, &locator);

    if params.reference {
        tracing::debug!("reference collection requested for {}, not supported", uri);
    }

    Ok(response)
}

/// Flatten an outline in pre-order.
///
/// Qualified names are built from the outline nesting rather than from
/// container names, which may collide.
pub fn flatten_symbols(
    uri: &Url,
    outline: &[DocumentSymbol],
    package: &PackageLocator,
) -> Vec<DetailSymbol> {
    let mut out = Vec::new();
    flatten_into(uri, outline, "", "", package, &mut out);
    out
}

#[allow(deprecated)]
fn flatten_into(
    uri: &Url,
    symbols: &[DocumentSymbol],
    prefix: &str,
    container: &str,
    package: &PackageLocator,
    out: &mut Vec<DetailSymbol>,
) {
    for symbol in symbols {
        let path = if prefix.is_empty() {
            symbol.name.clone()
        } else {
            format!("{}.{}", prefix, symbol.name)
        };

        let qname = if package.name.is_empty() {
            path.clone()
        } else {
            format!("{}.{}", package.name, path)
        };

        out.push(DetailSymbol {
            symbol: SymbolInformation {
                name: symbol.name.clone(),
                kind: symbol.kind,
                tags: symbol.tags.clone(),
                deprecated: symbol.deprecated,
                location: Location::new(uri.clone(), symbol.selection_range),
                container_name: (!container.is_empty()).then(|| container.to_string()),
            },
            qname,
            package: package.clone(),
        });

        if let Some(children) = &symbol.children {
            flatten_into(uri, children, &path, &symbol.name, package, out);
        }
    }
}
