//! Wire types for the extended requests.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{Location, SymbolInformation, SymbolKind};

/// Identity of a package for cross-repository linking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageLocator {
    pub name: String,
    pub repo_uri: String,
    /// Semantic version or short commit hash; empty when unknown
    pub version: String,
}

impl PackageLocator {
    /// True if nothing is filled in.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.repo_uri.is_empty() && self.version.is_empty()
    }
}

/// Result of an extended definition lookup.
///
/// Same-view jumps carry only `location`; cross-view jumps carry only
/// `qname`, `kind` and `package`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolLocator {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub qname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SymbolKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub package: PackageLocator,
}

impl SymbolLocator {
    /// Locator for a definition inside the requester's view.
    pub fn same_view(location: Location) -> Self {
        SymbolLocator {
            location: Some(location),
            ..Default::default()
        }
    }

    /// Locator for a definition in another view.
    pub fn cross_view(qname: String, kind: SymbolKind, package: PackageLocator) -> Self {
        SymbolLocator {
            qname,
            kind: Some(kind),
            location: None,
            package,
        }
    }
}

/// One flattened outline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSymbol {
    pub symbol: SymbolInformation,
    pub qname: String,
    pub package: PackageLocator,
}

/// A use of a symbol found in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub location: Location,
    pub target: SymbolLocator,
}

/// Parameters of `textDocument/full`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullParams {
    pub text_document: tower_lsp::lsp_types::TextDocumentIdentifier,
    #[serde(default)]
    pub reference: bool,
}

/// Response of `textDocument/full`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullResponse {
    pub symbols: Vec<DetailSymbol>,
    pub references: Vec<Reference>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tower_lsp::lsp_types::{Position, Range, Url};

    #[test]
    fn test_same_view_serialization() {
        let location = Location::new(
            Url::parse("file:///ws/main.go").unwrap(),
            Range::new(Position::new(3, 5), Position::new(3, 9)),
        );
        let value = serde_json::to_value(SymbolLocator::same_view(location)).unwrap();

        assert!(value.get("qname").is_none());
        assert!(value.get("kind").is_none());
        assert_eq!(value["location"]["uri"], "file:///ws/main.go");
        assert_eq!(value["package"], json!({"name": "", "repoUri": "", "version": ""}));
    }

    #[test]
    fn test_cross_view_serialization() {
        let pkg = PackageLocator {
            name: "errors".into(),
            repo_uri: "https://github.com/pkg/errors".into(),
            version: "v0.9.1".into(),
        };
        let value =
            serde_json::to_value(SymbolLocator::cross_view("errors.Wrap".into(), SymbolKind::FUNCTION, pkg))
                .unwrap();

        assert!(value.get("location").is_none());
        assert_eq!(value["qname"], "errors.Wrap");
        assert_eq!(value["kind"], 12);
        assert_eq!(value["package"]["repoUri"], "https://github.com/pkg/errors");
    }

    #[test]
    fn test_full_params_reference_defaults_false() {
        let params: FullParams =
            serde_json::from_value(json!({"textDocument": {"uri": "file:///a.go"}})).unwrap();
        assert!(!params.reference);
    }
}
