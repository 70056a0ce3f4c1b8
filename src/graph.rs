//! The output of a mapping run: a set of triples and the namespace
//! bindings used to abbreviate them.
use curie::PrefixMapping;
use indexmap::{IndexMap, IndexSet};

use crate::error::Xml2OwlError;
use crate::io::RdfFormat;
use crate::model::*;

use std::io::Write;

/// Namespace bindings, in declaration order.
///
/// The default namespace is held apart from the prefixed ones.
#[derive(Clone, Debug, Default)]
pub struct NamespaceTable {
    default: Option<String>,
    prefixes: IndexMap<String, String>,
}

impl NamespaceTable {
    pub fn new() -> NamespaceTable {
        NamespaceTable::default()
    }

    pub fn set_default(&mut self, namespace: &str) {
        self.default = Some(namespace.to_string());
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Bind `prefix` to `namespace`, replacing any earlier binding of
    /// the same prefix. The empty prefix sets the default namespace.
    pub fn add_prefix(&mut self, prefix: &str, namespace: &str) {
        if prefix.is_empty() {
            self.set_default(namespace);
            return;
        }

        self.prefixes
            .insert(prefix.to_string(), namespace.to_string());
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        if prefix.is_empty() {
            return self.default_namespace();
        }
        self.prefixes.get(prefix).map(|s| &s[..])
    }

    /// Prefixed bindings, in the order they were added.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (&p[..], &ns[..]))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len() + self.default.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// These bindings as a `curie` mapping.
    pub fn prefix_mapping(&self) -> PrefixMapping {
        let mut mapping = PrefixMapping::default();
        if let Some(d) = &self.default {
            mapping.set_default(d);
        }
        for (p, ns) in &self.prefixes {
            // The only prefix refused is `_`, which is reserved for
            // blank nodes anyway.
            mapping.add_prefix(p, ns).ok();
        }
        mapping
    }
}

/// An append-only set of triples.
///
/// Triples are kept in the order they were first added; adding a
/// statement which is already present has no effect.
#[derive(Debug, Default)]
pub struct Graph {
    triples: IndexSet<Triple>,
    namespaces: NamespaceTable,
    base: Option<String>,
}

impl Graph {
    pub fn new() -> Graph {
        Graph::default()
    }

    /// A graph whose serialisations declare `base` as their base IRI.
    pub fn with_base<S: Into<String>>(base: S) -> Graph {
        Graph {
            base: Some(base.into()),
            ..Default::default()
        }
    }

    /// Add a triple, returning false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceTable {
        &mut self.namespaces
    }

    /// All triples with the given subject IRI.
    pub fn about<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a Triple> {
        self.triples
            .iter()
            .filter(move |t| matches!(&t.subject, Subject::IRI(iri) if &**iri == subject))
    }

    /// Write this graph to `write` in the given syntax.
    pub fn write<W: Write>(&self, write: W, format: RdfFormat) -> Result<(), Xml2OwlError> {
        crate::io::write_graph(write, self, format)
    }
}
