//! An in-memory ontology derived from an XML schema.
//!
//! A [`SchemaOntology`] keeps the ontology's own triples, so that it
//! can be written out again, together with an index of the parts the
//! mapper asks about.
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};

use crate::error::{invalid, Xml2OwlError};
use crate::graph::NamespaceTable;
use crate::model::*;
use crate::ontology::*;
use crate::vocab::*;

use std::collections::{HashMap, HashSet};

/// Options which affect how an ontology is interpreted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OntologyConfiguration {
    /// Prefix of object property names, `has` for `hasAddress`.
    pub object_property_prefix: String,
    /// Prefix of datatype property names, `has` for `hasName`.
    pub datatype_property_prefix: String,
}

impl Default for OntologyConfiguration {
    fn default() -> Self {
        OntologyConfiguration {
            object_property_prefix: DEFAULT_PROPERTY_PREFIX.to_string(),
            datatype_property_prefix: DEFAULT_PROPERTY_PREFIX.to_string(),
        }
    }
}

impl OntologyConfiguration {
    /// The local name of the property carrying mixed text content.
    pub fn mixed_content_property(&self) -> String {
        property_name(&self.datatype_property_prefix, MIXED_CONTENT_PROPERTY)
    }
}

#[derive(Debug, Default)]
pub struct SchemaOntology {
    triples: IndexSet<Triple>,
    classes: IndexMap<IRI, OntClass>,
    properties: HashMap<IRI, PropertyKind>,
    mixed: HashSet<IRI>,
    subjects: IndexSet<IRI>,
    namespaces: NamespaceTable,
    config: OntologyConfiguration,
}

impl SchemaOntology {
    /// Index an ontology from its triples.
    ///
    /// Fails if an RDF list used by `owl:oneOf` is malformed.
    pub fn from_triples<I: IntoIterator<Item = Triple>>(
        triples: I,
        namespaces: NamespaceTable,
        config: OntologyConfiguration,
    ) -> Result<SchemaOntology, Xml2OwlError> {
        let mut so = SchemaOntology {
            triples: triples.into_iter().collect(),
            namespaces,
            config,
            ..Default::default()
        };

        so.index()?;
        Ok(so)
    }

    fn index(&mut self) -> Result<(), Xml2OwlError> {
        let mut blanks: HashMap<&BlankNode, Vec<&Triple>> = HashMap::new();

        for t in &self.triples {
            match &t.subject {
                Subject::IRI(iri) => {
                    self.subjects.insert(iri.clone());
                }
                Subject::BlankNode(bn) => {
                    blanks.entry(bn).or_default().push(t);
                }
            }
        }

        // Declarations first, so that subclass edges can find their
        // subject wherever they are in the file
        for t in &self.triples {
            if &*t.predicate != RDF::Type.iri_s() {
                continue;
            }

            let (subject, object) = match (&t.subject, &t.object) {
                (Subject::IRI(s), Object::IRI(o)) => (s, o),
                _ => continue,
            };

            match &**object {
                o if o == OWL::Class.iri_s() => {
                    self.classes
                        .entry(subject.clone())
                        .or_insert_with(|| OntClass::new(subject.clone(), MetaType::Class));
                }
                o if o == RDFS::Datatype.iri_s() => {
                    self.classes
                        .entry(subject.clone())
                        .or_insert_with(|| OntClass::new(subject.clone(), MetaType::Datatype));
                }
                o if o == OWL::ObjectProperty.iri_s() => {
                    self.properties.entry(subject.clone()).or_default().object = true;
                }
                o if o == OWL::DatatypeProperty.iri_s() => {
                    self.properties.entry(subject.clone()).or_default().datatype = true;
                }
                _ => {}
            }
        }

        for t in &self.triples {
            if &*t.predicate != RDFS::SubClassOf.iri_s() {
                continue;
            }

            let sub = match &t.subject {
                Subject::IRI(iri) => iri,
                Subject::BlankNode(_) => continue,
            };

            let sc = match &t.object {
                Object::IRI(iri) => SuperClass::Named(iri.clone()),
                Object::BlankNode(bn) => superclass_from_blank(bn, &blanks)?,
                Object::Literal(l) => {
                    warn!("Literal {:?} used as superclass of {}", l.literal(), sub);
                    SuperClass::Anonymous
                }
            };

            match self.classes.get_mut(sub) {
                Some(class) => class.add_superclass(sc),
                None => debug!("Ignoring subClassOf of undeclared class {}", sub),
            }
        }

        let mixed_property = self.config.mixed_content_property();
        for class in self.classes.values() {
            let is_mixed = class
                .superclasses()
                .iter()
                .filter_map(SuperClass::as_restriction)
                .filter(|r| r.is_all_values_from())
                .filter_map(|r| r.on_property.as_ref())
                .any(|p| p.local_name() == mixed_property);

            if is_mixed {
                self.mixed.insert(class.iri().clone());
            }
        }

        Ok(())
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn classes(&self) -> impl Iterator<Item = &OntClass> {
        self.classes.values()
    }

    pub fn mixed_classes(&self) -> impl Iterator<Item = &IRI> {
        self.mixed.iter()
    }

    pub fn configuration(&self) -> &OntologyConfiguration {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

fn superclass_from_blank(
    bn: &BlankNode,
    blanks: &HashMap<&BlankNode, Vec<&Triple>>,
) -> Result<SuperClass, Xml2OwlError> {
    let description = match blanks.get(bn) {
        Some(d) => d,
        None => return Ok(SuperClass::Anonymous),
    };

    let value = |p: &str| {
        description
            .iter()
            .find(|t| &*t.predicate == p)
            .map(|t| &t.object)
    };

    let is_restriction = description.iter().any(|t| {
        &*t.predicate == RDF::Type.iri_s()
            && t.object.as_iri().map(|o| &**o) == Some(OWL::Restriction.iri_s())
    });

    if let Some(members) = value(OWL::OneOf.iri_s()) {
        return Ok(SuperClass::Enumeration(decode_list(members, blanks)?));
    }

    if is_restriction || value(OWL::OnProperty.iri_s()).is_some() {
        let on_property = value(OWL::OnProperty.iri_s())
            .and_then(Object::as_iri)
            .cloned();

        let kind = match value(OWL::AllValuesFrom.iri_s()) {
            Some(range) => RestrictionKind::AllValuesFrom(range.as_iri().cloned()),
            None => RestrictionKind::Other,
        };

        return Ok(SuperClass::Restriction(Restriction { on_property, kind }));
    }

    Ok(SuperClass::Anonymous)
}

/// Decode an RDF collection starting at `head`.
fn decode_list(
    head: &Object,
    blanks: &HashMap<&BlankNode, Vec<&Triple>>,
) -> Result<Vec<Object>, Xml2OwlError> {
    let mut members = vec![];
    let mut seen = HashSet::new();
    let mut current = head;

    loop {
        let bn = match current {
            Object::IRI(iri) if &**iri == RDF::Nil.iri_s() => return Ok(members),
            Object::BlankNode(bn) => bn,
            _ => return Err(invalid!("Malformed RDF list at {:?}", current)),
        };

        if !seen.insert(bn) {
            return Err(invalid!("Cyclic RDF list at {}", bn));
        }

        let description = blanks
            .get(bn)
            .ok_or_else(|| invalid!("Empty RDF list node {}", bn))?;

        let object_of = |p: &str| {
            description
                .iter()
                .find(|t| &*t.predicate == p)
                .map(|t| &t.object)
                .ok_or_else(|| invalid!("RDF list node {} has no {}", bn, p))
        };

        members.push(object_of(RDF::First.iri_s())?.clone());
        current = object_of(RDF::Rest.iri_s())?;
    }
}

impl OntologyModel for SchemaOntology {
    fn class(&self, iri: &str) -> Option<&OntClass> {
        self.classes.get(iri)
    }

    fn property_kind(&self, property: &IRI) -> PropertyKind {
        self.properties.get(property).copied().unwrap_or_default()
    }

    fn is_mixed_class(&self, class: &IRI) -> bool {
        self.mixed.contains(class)
    }

    fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    fn object_property_prefix(&self) -> &str {
        &self.config.object_property_prefix
    }

    fn datatype_property_prefix(&self) -> &str {
        &self.config.datatype_property_prefix
    }

    fn named_subjects(&self) -> Box<dyn Iterator<Item = &IRI> + '_> {
        Box::new(self.subjects.iter())
    }
}

/// Build a [`SchemaOntology`] in code.
///
/// Each call adds the triples that an XSD to OWL conversion would have
/// produced for the same construct.
///
/// # Examples
/// ```
/// # use xml2owl::ontology::OntologyModel;
/// # use xml2owl::ontology::schema::SchemaOntologyBuilder;
/// let ont = SchemaOntologyBuilder::new()
///     .class("http://www.example.com/person#Person")
///     .datatype_property("http://www.example.com/person#hasName")
///     .all_values_from(
///         "http://www.example.com/person#Person",
///         "http://www.example.com/person#hasName",
///         "http://www.w3.org/2001/XMLSchema#string",
///     )
///     .build()
///     .unwrap();
///
/// assert!(ont.class("http://www.example.com/person#Person").is_some());
/// ```
#[derive(Debug, Default)]
pub struct SchemaOntologyBuilder {
    b: Build,
    triples: Vec<Triple>,
    namespaces: NamespaceTable,
    mixed: Vec<String>,
    config: OntologyConfiguration,
    bnode: usize,
}

impl SchemaOntologyBuilder {
    pub fn new() -> SchemaOntologyBuilder {
        SchemaOntologyBuilder::default()
    }

    fn typed(mut self, iri: &str, ty: &str) -> Self {
        let t = Triple::new(self.b.iri(iri), self.b.iri(RDF::Type.iri_s()), self.b.iri(ty));
        self.triples.push(t);
        self
    }

    fn fresh_blank(&mut self) -> BlankNode {
        self.bnode += 1;
        self.b.blank(format!("bn{}", self.bnode))
    }

    pub fn class(self, iri: &str) -> Self {
        self.typed(iri, OWL::Class.iri_s())
    }

    pub fn datatype(self, iri: &str) -> Self {
        self.typed(iri, RDFS::Datatype.iri_s())
    }

    pub fn object_property(self, iri: &str) -> Self {
        self.typed(iri, OWL::ObjectProperty.iri_s())
    }

    pub fn datatype_property(self, iri: &str) -> Self {
        self.typed(iri, OWL::DatatypeProperty.iri_s())
    }

    pub fn sub_class_of(mut self, sub: &str, sup: &str) -> Self {
        let t = Triple::new(
            self.b.iri(sub),
            self.b.iri(RDFS::SubClassOf.iri_s()),
            self.b.iri(sup),
        );
        self.triples.push(t);
        self
    }

    /// Restrict the values of `property` on `class` to `range`.
    pub fn all_values_from(mut self, class: &str, property: &str, range: &str) -> Self {
        let bn = self.fresh_blank();
        let b = &self.b;
        self.triples.extend(vec![
            Triple::new(b.iri(class), b.iri(RDFS::SubClassOf.iri_s()), bn.clone()),
            Triple::new(bn.clone(), b.iri(RDF::Type.iri_s()), b.iri(OWL::Restriction.iri_s())),
            Triple::new(bn.clone(), b.iri(OWL::OnProperty.iri_s()), b.iri(property)),
            Triple::new(bn, b.iri(OWL::AllValuesFrom.iri_s()), b.iri(range)),
        ]);
        self
    }

    /// Add an enumeration of string values as a superclass of `class`.
    pub fn one_of(mut self, class: &str, members: &[&str]) -> Self {
        let enumeration = self.fresh_blank();
        let nodes: Vec<BlankNode> = members.iter().map(|_| self.fresh_blank()).collect();

        let b = &self.b;
        let mut triples = vec![Triple::new(
            b.iri(class),
            b.iri(RDFS::SubClassOf.iri_s()),
            enumeration.clone(),
        )];

        let head: Object = match nodes.first() {
            Some(bn) => bn.clone().into(),
            None => b.iri(RDF::Nil.iri_s()).into(),
        };
        triples.push(Triple::new(enumeration, b.iri(OWL::OneOf.iri_s()), head));

        for (i, (bn, m)) in nodes.iter().zip(members).enumerate() {
            let rest: Object = match nodes.get(i + 1) {
                Some(next) => next.clone().into(),
                None => b.iri(RDF::Nil.iri_s()).into(),
            };
            triples.push(Triple::new(
                bn.clone(),
                b.iri(RDF::First.iri_s()),
                Literal::Datatype {
                    literal: m.to_string(),
                    datatype_iri: b.iri(XSD::String.iri_s()),
                },
            ));
            triples.push(Triple::new(bn.clone(), b.iri(RDF::Rest.iri_s()), rest));
        }

        self.triples.extend(triples);
        self
    }

    /// Declare that instances of `class` may interleave text and
    /// elements.
    ///
    /// This adds the text content property to the class, in the same
    /// namespace, so the declaration survives writing the ontology out.
    pub fn mixed_class(mut self, class: &str) -> Self {
        let local = local_name(class);
        let ns = &class[..class.len() - local.len()];
        let property = format!("{}{}", ns, self.config.mixed_content_property());

        self.mixed.push(class.to_string());
        self.datatype_property(&property)
            .all_values_from(class, &property, XSD::String.iri_s())
    }

    pub fn prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.namespaces.add_prefix(prefix, namespace);
        self
    }

    pub fn property_prefixes(mut self, object: &str, datatype: &str) -> Self {
        self.config = OntologyConfiguration {
            object_property_prefix: object.to_string(),
            datatype_property_prefix: datatype.to_string(),
        };
        self
    }

    pub fn build(self) -> Result<SchemaOntology, Xml2OwlError> {
        let mut so = SchemaOntology::from_triples(self.triples, self.namespaces, self.config)?;
        for m in self.mixed {
            let iri = self.b.iri(m);
            so.mixed.insert(iri);
        }
        Ok(so)
    }
}
