//! The ontology seen by the mapper.
//!
//! # Overview
//!
//! The mapper never builds or changes an ontology; it asks a handful
//! of questions of it, collected in the [`OntologyModel`] trait: what
//! a class is, what its direct superclasses are, how a property is
//! classified, and which classes admit mixed content.
//!
//! [`SchemaOntology`](schema/struct.SchemaOntology.html) is an
//! in-memory implementation, which can be built programmatically with
//! a [`SchemaOntologyBuilder`](schema/struct.SchemaOntologyBuilder.html)
//! or read from RDF/XML with [`crate::io::rdf::reader`]. Any other
//! store that can answer the same questions can be used in its place.

pub mod schema;

use crate::error::{invalid, Xml2OwlError};
use crate::graph::NamespaceTable;
use crate::model::*;

/// Whether a typed node of the ontology is a class or a datatype.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MetaType {
    /// An `owl:Class`
    Class,
    /// An `rdfs:Datatype`, derived from a named simple type
    Datatype,
}

/// A typed node of the ontology with its direct superclasses.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OntClass {
    iri: IRI,
    meta: MetaType,
    superclasses: Vec<SuperClass>,
}

impl OntClass {
    pub fn new(iri: IRI, meta: MetaType) -> OntClass {
        OntClass {
            iri,
            meta,
            superclasses: vec![],
        }
    }

    pub fn iri(&self) -> &IRI {
        &self.iri
    }

    pub fn meta(&self) -> MetaType {
        self.meta
    }

    pub fn is_class(&self) -> bool {
        self.meta == MetaType::Class
    }

    pub fn is_datatype(&self) -> bool {
        self.meta == MetaType::Datatype
    }

    pub fn superclasses(&self) -> &[SuperClass] {
        &self.superclasses
    }

    pub(crate) fn add_superclass(&mut self, sc: SuperClass) {
        if !self.superclasses.contains(&sc) {
            self.superclasses.push(sc);
        }
    }
}

/// The target of an `rdfs:subClassOf` edge.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SuperClass {
    /// A named class, which is searched in turn.
    Named(IRI),
    /// A property restriction.
    Restriction(Restriction),
    /// An `owl:oneOf` enumeration.
    Enumeration(Vec<Object>),
    /// Any other anonymous class expression.
    Anonymous,
}

impl SuperClass {
    pub fn as_named(&self) -> Option<&IRI> {
        match self {
            SuperClass::Named(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_restriction(&self) -> Option<&Restriction> {
        match self {
            SuperClass::Restriction(r) => Some(r),
            _ => None,
        }
    }
}

/// An `owl:Restriction` node.
///
/// Both the property and the range can be missing from a malformed
/// ontology; the accessors report this as an error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Restriction {
    pub on_property: Option<IRI>,
    pub kind: RestrictionKind,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RestrictionKind {
    /// `owl:allValuesFrom`, with its range if that is named.
    AllValuesFrom(Option<IRI>),
    /// Cardinality, `owl:someValuesFrom` and the rest.
    Other,
}

impl Restriction {
    pub fn all_values_from(on_property: IRI, range: IRI) -> Restriction {
        Restriction {
            on_property: Some(on_property),
            kind: RestrictionKind::AllValuesFrom(Some(range)),
        }
    }

    pub fn is_all_values_from(&self) -> bool {
        matches!(self.kind, RestrictionKind::AllValuesFrom(_))
    }

    pub fn property(&self) -> Result<&IRI, Xml2OwlError> {
        self.on_property
            .as_ref()
            .ok_or_else(|| invalid!("Restriction without a named owl:onProperty"))
    }

    pub fn range(&self) -> Result<&IRI, Xml2OwlError> {
        match &self.kind {
            RestrictionKind::AllValuesFrom(Some(range)) => Ok(range),
            RestrictionKind::AllValuesFrom(None) => {
                Err(invalid!("owl:allValuesFrom without a named range"))
            }
            RestrictionKind::Other => Err(invalid!("Not an owl:allValuesFrom restriction")),
        }
    }
}

/// How a property is declared. A property may be both an object and
/// a datatype property.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PropertyKind {
    pub object: bool,
    pub datatype: bool,
}

impl PropertyKind {
    pub fn is_object(&self) -> bool {
        self.object
    }

    pub fn is_datatype(&self) -> bool {
        self.datatype
    }

    pub fn is_dual(&self) -> bool {
        self.object && self.datatype
    }

    pub fn is_declared(&self) -> bool {
        self.object || self.datatype
    }
}

/// The questions the mapper asks of an ontology.
pub trait OntologyModel {
    /// The class or datatype with this IRI.
    fn class(&self, iri: &str) -> Option<&OntClass>;

    /// The direct superclasses of `class`, empty if it is unknown.
    fn direct_superclasses(&self, class: &IRI) -> &[SuperClass] {
        self.class(class).map(|c| c.superclasses()).unwrap_or(&[])
    }

    fn property_kind(&self, property: &IRI) -> PropertyKind;

    /// True if instances of `class` can interleave text and elements.
    fn is_mixed_class(&self, class: &IRI) -> bool;

    fn namespaces(&self) -> &NamespaceTable;

    fn object_property_prefix(&self) -> &str;

    fn datatype_property_prefix(&self) -> &str;

    /// Every IRI which is the subject of a statement in the ontology.
    fn named_subjects(&self) -> Box<dyn Iterator<Item = &IRI> + '_>;
}
