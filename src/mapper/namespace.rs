//! The working namespace of an instance document and its prefix.
use log::{debug, warn};
use oxiri::Iri;

use crate::graph::NamespaceTable;
use crate::io::xml::Element;
use crate::mapper::NamespaceBinding;
use crate::vocab::{is_ncname, FALLBACK_PREFIX, NOT_ABSOLUTE_NS, NOT_VALID_NS};

/// The namespace against which element and attribute names become
/// class and property IRIs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocumentNamespace {
    /// Ends with `#`, unless given explicitly.
    pub namespace: String,
    pub prefix: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Validity {
    Absolute,
    NotAbsolute,
    NotValid,
}

fn validity(uri: &str) -> Validity {
    if Iri::parse(uri).is_ok() {
        return Validity::Absolute;
    }

    // A relative reference resolves against any absolute base
    let relative = Iri::parse("http://example.org/")
        .map(|base| base.resolve(uri).is_ok())
        .unwrap_or(false);

    if relative {
        Validity::NotAbsolute
    } else {
        Validity::NotValid
    }
}

/// Work out the document namespace from the root element.
///
/// An explicit `binding` is used as it is. Otherwise the root's
/// namespace gets a `#`, and the first usable candidate of the root's
/// own prefix, the last path segment and the last `:` segment of the
/// namespace becomes the prefix. Elements in no namespace, or in one
/// that is not an absolute IRI, get a fixed placeholder namespace.
pub fn derive(root: &Element, binding: Option<&NamespaceBinding>) -> DocumentNamespace {
    if let Some(b) = binding {
        return DocumentNamespace {
            namespace: b.namespace.clone(),
            prefix: b.prefix.clone(),
        };
    }

    let uri = root.namespace.as_deref().unwrap_or("");

    let placeholder = |ns: &str| DocumentNamespace {
        namespace: ns.to_string(),
        prefix: FALLBACK_PREFIX.to_string(),
    };

    match validity(uri) {
        Validity::NotAbsolute => {
            warn!("Namespace {:?} is not absolute, using {}", uri, NOT_ABSOLUTE_NS);
            placeholder(NOT_ABSOLUTE_NS)
        }
        Validity::NotValid => {
            warn!("Namespace {:?} is not a valid IRI, using {}", uri, NOT_VALID_NS);
            placeholder(NOT_VALID_NS)
        }
        Validity::Absolute => {
            let dn = DocumentNamespace {
                namespace: format!("{}#", uri),
                prefix: prefix_for(root.prefix.as_deref(), uri),
            };
            debug!("Document namespace {} bound to {}", dn.namespace, dn.prefix);
            dn
        }
    }
}

fn prefix_for(root_prefix: Option<&str>, uri: &str) -> String {
    let after = |c: char| uri.rfind(c).map(|i| &uri[i + 1..]);

    [root_prefix, after('/'), after(':')]
        .into_iter()
        .flatten()
        .find(|p| is_ncname(p) && !p.to_ascii_lowercase().starts_with("xml"))
        .unwrap_or(FALLBACK_PREFIX)
        .to_string()
}

/// Copy the ontology's prefixes into `to`. An ontology default
/// namespace becomes `base`, so that unprefixed names in the output
/// refer to instances.
pub fn copy_prefixes(from: &NamespaceTable, base: &str, to: &mut NamespaceTable) {
    for (prefix, ns) in from.prefixes() {
        to.add_prefix(prefix, ns);
    }

    if from.default_namespace().is_some() {
        to.set_default(base);
    }
}
