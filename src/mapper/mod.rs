//! Map an XML instance document onto an RDF graph.
//!
//! # Overview
//!
//! An [`XmlMapper`] walks the element tree of a [`Document`] depth
//! first, carrying the current subject resource and its class. For
//! each child element it asks the [`TypeResolver`] what the element
//! is:
//!
//! - an element whose type is a class becomes a new resource, linked
//! from the subject by an object property, and is walked in turn;
//! - an element whose type is a datatype becomes a typed literal of
//! its text;
//! - an element the ontology knows nothing about is skipped.
//!
//! Attributes become literals, or resource references for `anyURI`.
//! Text is only kept for classes with mixed content.
//!
//! A mapper is used for exactly one run: `convert` consumes it, and a
//! failed run returns an error rather than a partial graph.
pub mod namer;
pub mod namespace;
pub mod resolve;

use log::{debug, warn};
use oxiri::Iri;

use crate::error::Xml2OwlError;
use crate::graph::Graph;
use crate::io::xml::{Document, Element, Node};
use crate::model::*;
use crate::ontology::OntologyModel;
use crate::vocab::{property_name, Namespace, DEFAULT_BASE, MIXED_CONTENT_PROPERTY, RDF, XSD};

use self::namer::ResourceNamer;
use self::namespace::DocumentNamespace;
use self::resolve::TypeResolver;

/// An explicit namespace and prefix for the instance document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamespaceBinding {
    /// Used as it is, so it should end with `#`.
    pub namespace: String,
    pub prefix: String,
}

/// Options for a mapping run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MapperConfiguration {
    /// Base namespace of instance resources, without a trailing `#`.
    pub base: String,
    /// Overrides the namespace derived from the root element.
    pub namespace: Option<NamespaceBinding>,
    /// Fixes the run nonce, which is otherwise random.
    pub nonce: Option<u32>,
}

impl Default for MapperConfiguration {
    fn default() -> Self {
        MapperConfiguration {
            base: DEFAULT_BASE.to_string(),
            namespace: None,
            nonce: None,
        }
    }
}

impl MapperConfiguration {
    /// The IRI under which instance resources are minted.
    pub fn base_iri(&self) -> String {
        format!("{}#", self.base)
    }
}

/// Map `doc` with `ont`, returning the instance graph.
pub fn convert<O: OntologyModel>(
    doc: &Document,
    ont: &O,
    config: MapperConfiguration,
) -> Result<Graph, Xml2OwlError> {
    XmlMapper::new(doc, ont, config).convert()
}

pub struct XmlMapper<'a, O: OntologyModel> {
    doc: &'a Document,
    ont: &'a O,
    b: Build,
    namer: ResourceNamer,
    graph: Graph,
    config: MapperConfiguration,
}

impl<'a, O: OntologyModel> XmlMapper<'a, O> {
    pub fn new(doc: &'a Document, ont: &'a O, config: MapperConfiguration) -> XmlMapper<'a, O> {
        let mut namer = ResourceNamer::new(&config.base_iri(), config.nonce);
        namer.seed(ont.named_subjects());

        XmlMapper {
            doc,
            ont,
            b: Build::new(),
            namer,
            graph: Graph::with_base(config.base.clone()),
            config,
        }
    }

    pub fn nonce(&self) -> u32 {
        self.namer.nonce()
    }

    pub fn convert(mut self) -> Result<Graph, Xml2OwlError> {
        let doc = self.doc;
        let root = doc.root();

        let dn = namespace::derive(root, self.config.namespace.as_ref());
        namespace::copy_prefixes(
            self.ont.namespaces(),
            &self.config.base_iri(),
            self.graph.namespaces_mut(),
        );
        self.graph.namespaces_mut().add_prefix(&dn.prefix, &dn.namespace);

        let b = Build::new();
        let resolver = TypeResolver::new(self.ont, &b, &dn.namespace);

        let mut run = Run {
            mapper: &mut self,
            resolver,
            dn: &dn,
        };
        run.root(root).map_err(|e| e.within(root.to_string()))?;

        debug!(
            "Mapped {} to {} triples",
            root,
            self.graph.len()
        );
        Ok(self.graph)
    }
}

/// The state of a run once the document namespace is known.
struct Run<'m, 'a, O: OntologyModel> {
    mapper: &'m mut XmlMapper<'a, O>,
    resolver: TypeResolver<'m, O>,
    dn: &'m DocumentNamespace,
}

impl<'m, 'a, O: OntologyModel> Run<'m, 'a, O> {
    fn root(&mut self, root: &Element) -> Result<(), Xml2OwlError> {
        let class = match self.resolver.xsi_type(root)? {
            Some(iri) => match self.resolver.resource_type(&iri) {
                Some(tr) if !tr.is_datatype() => tr.target,
                _ => {
                    return Err(Xml2OwlError::mapping(format!(
                        "xsi:type of the root element does not name a class: {}",
                        iri
                    )))
                }
            },
            None => {
                let iri = format!("{}{}", self.dn.namespace, root.local_name);
                match self.mapper.ont.class(&iri) {
                    Some(c) if c.is_class() => c.iri().clone(),
                    _ => {
                        return Err(Xml2OwlError::mapping(format!(
                            "No ontology class for the root element: {}",
                            iri
                        )))
                    }
                }
            }
        };

        let subject = self.instance(&class);
        self.attributes(root, &subject, &class);
        self.children(root, &subject, &class)
    }

    fn children(&mut self, element: &Element, subject: &IRI, class: &IRI) -> Result<(), Xml2OwlError> {
        for child in &element.children {
            self.node(child, subject, class)
                .map_err(|e| e.within(child.to_string()))?;
        }
        Ok(())
    }

    fn node(&mut self, node: &Node, subject: &IRI, class: &IRI) -> Result<(), Xml2OwlError> {
        match node {
            Node::Element(e) => self.element(e, subject, class),
            Node::Text(t) => {
                self.text(t, subject, class);
                Ok(())
            }
            Node::Comment(_) | Node::ProcessingInstruction(_) => Ok(()),
        }
    }

    fn element(&mut self, element: &Element, subject: &IRI, class: &IRI) -> Result<(), Xml2OwlError> {
        let tr = match self.resolver.resolve_element(class, element)? {
            Some(tr) => tr,
            None => {
                debug!("Skipping {}, which is not a property of {}", element, class);
                return Ok(());
            }
        };

        if tr.is_datatype() {
            let text = element.text();
            let text = text.trim();
            if !text.is_empty() {
                let property = self.property(self.mapper.ont.datatype_property_prefix(), &element.local_name);
                let object = self.value(&tr, text);
                self.insert(subject.clone(), property, object);
            }
            return Ok(());
        }

        let object = self.instance(&tr.target);
        let property = self.property(self.mapper.ont.object_property_prefix(), &element.local_name);
        self.insert(subject.clone(), property, object.clone());

        self.attributes(element, &object, &tr.target);
        self.children(element, &object, &tr.target)
    }

    /// Attributes never fail: anything the ontology cannot type is
    /// kept as a plain literal.
    fn attributes(&mut self, element: &Element, subject: &IRI, class: &IRI) {
        for attr in &element.attributes {
            if attr.is_in(Namespace::XSI) {
                continue;
            }

            let property = self.property(
                self.mapper.ont.datatype_property_prefix(),
                &attr.local_name,
            );

            let object = match self.resolver.resolve(class, &attr.local_name) {
                Some(tr) if tr.is_datatype() => self.value(&tr, &attr.value),
                other => {
                    match other {
                        Some(tr) => warn!(
                            "Attribute {} of {} has class range {}, keeping it as a literal",
                            attr, element, tr.target
                        ),
                        None => warn!(
                            "Attribute {} of {} is not a property of {}, keeping it as a literal",
                            attr, element, class
                        ),
                    }
                    Literal::Simple {
                        literal: attr.value.clone(),
                    }
                    .into()
                }
            };

            self.insert(subject.clone(), property, object);
        }
    }

    fn text(&mut self, text: &str, subject: &IRI, class: &IRI) {
        let text = text.trim();
        if text.is_empty() || !self.mapper.ont.is_mixed_class(class) {
            return;
        }

        let property = self.property(self.mapper.ont.datatype_property_prefix(), MIXED_CONTENT_PROPERTY);
        let object = Literal::Datatype {
            literal: text.to_string(),
            datatype_iri: self.mapper.b.iri(XSD::String.iri_s()),
        };
        self.insert(subject.clone(), property, object);
    }

    /// A new resource of `class`, with its type.
    fn instance(&mut self, class: &IRI) -> IRI {
        let id = self.mapper.namer.mint(class);
        let iri = self.mapper.b.iri(id);

        let ty = self.mapper.b.iri(RDF::Type.iri_s());
        self.insert(iri.clone(), ty, class.clone());
        iri
    }

    fn property(&self, prefix: &str, local_name: &str) -> IRI {
        self.mapper
            .b
            .iri(format!("{}{}", self.dn.namespace, property_name(prefix, local_name)))
    }

    /// The object for `value` with datatype `tr`.
    ///
    /// `anyURI` values are resource references, resolved against the
    /// base when relative.
    fn value(&self, tr: &TypedResource, value: &str) -> Object {
        if tr.is_any_uri() {
            let resolved = match Iri::parse(value) {
                Ok(iri) => Ok(iri.into_inner().to_string()),
                Err(_) => Iri::parse(&self.mapper.config.base[..])
                    .and_then(|base| base.resolve(value))
                    .map(|iri| iri.into_inner()),
            };

            match resolved {
                Ok(iri) => return self.mapper.b.iri(iri).into(),
                Err(e) => warn!("Keeping {:?} as a literal, it is not an IRI: {}", value, e),
            }
        }

        Literal::Datatype {
            literal: value.to_string(),
            datatype_iri: tr.target.clone(),
        }
        .into()
    }

    fn insert<O2: Into<Object>>(&mut self, subject: IRI, predicate: IRI, object: O2) {
        self.mapper
            .graph
            .insert(Triple::new(subject, predicate, object));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::rdf::reader::{read, OntologyConfiguration};
    use crate::io::xml;
    use crate::ontology::schema::{SchemaOntology, SchemaOntologyBuilder};

    use pretty_assertions::assert_eq;

    const P: &str = "http://www.example.com/person#";
    const BASE: &str = "http://www.example.org/example#";

    fn p(s: &str) -> String {
        format!("{}{}", P, s)
    }

    fn ins(s: &str) -> String {
        format!("{}INS42_{}", BASE, s)
    }

    fn person() -> SchemaOntology {
        read(
            include_str!("../ont/person.owl").as_bytes(),
            OntologyConfiguration::default(),
        )
        .unwrap()
    }

    fn config() -> MapperConfiguration {
        MapperConfiguration {
            nonce: Some(42),
            ..Default::default()
        }
    }

    fn map_with<O: OntologyModel>(s: &str, ont: &O) -> Result<Graph, Xml2OwlError> {
        let doc = xml::read(s.as_bytes()).unwrap();
        convert(&doc, ont, config())
    }

    fn map(s: &str) -> Graph {
        let r = map_with(s, &person());
        assert!(r.is_ok(), "Expected graph, got failure:{:?}", r.err());
        r.unwrap()
    }

    fn typed(b: &Build, s: &str, datatype: &str) -> Object {
        Literal::Datatype {
            literal: s.to_string(),
            datatype_iri: b.iri(datatype),
        }
        .into()
    }

    fn assert_contains(g: &Graph, expected: &[Triple]) {
        for t in expected {
            assert!(g.contains(t), "Missing {:?}", t);
        }
    }

    /// Objects of all `predicate` statements.
    fn objects<'g>(g: &'g Graph, predicate: &str) -> Vec<&'g Object> {
        g.triples()
            .filter(|t| &*t.predicate == predicate)
            .map(|t| &t.object)
            .collect()
    }

    #[test]
    fn test_person() {
        let g = map(include_str!("../ont/xml/person.xml"));
        let b = Build::new();

        let person = b.iri(ins("Person_1"));
        let address = b.iri(ins("Address_1"));
        let ty = b.iri(RDF::Type.iri_s());

        let expected = vec![
            Triple::new(person.clone(), ty.clone(), b.iri(p("Person"))),
            Triple::new(
                person.clone(),
                b.iri(p("hasName")),
                typed(&b, "Alice", XSD::String.iri_s()),
            ),
            Triple::new(person, b.iri(p("hasAddress")), address.clone()),
            Triple::new(address.clone(), ty, b.iri(p("Address"))),
            Triple::new(
                address,
                b.iri(p("hasCity")),
                typed(&b, "Ankara", XSD::String.iri_s()),
            ),
        ];

        assert_contains(&g, &expected);
        assert_eq!(g.len(), expected.len());
    }

    #[test]
    fn test_namespaces() {
        let g = map(include_str!("../ont/xml/person.xml"));

        assert_eq!(g.base(), Some("http://www.example.org/example"));
        assert_eq!(g.namespaces().default_namespace(), Some(BASE));
        assert_eq!(g.namespaces().namespace("person"), Some(P));
        assert_eq!(
            g.namespaces().namespace("xsd"),
            Some("http://www.w3.org/2001/XMLSchema#")
        );
    }

    #[test]
    fn test_override_root() {
        let g = map(include_str!("../ont/xml/employee.xml"));
        let b = Build::new();

        let employee = b.iri(ins("Employee_1"));
        let expected = vec![
            Triple::new(
                employee.clone(),
                b.iri(RDF::Type.iri_s()),
                b.iri(p("Employee")),
            ),
            Triple::new(
                employee.clone(),
                b.iri(p("hasName")),
                typed(&b, "Bob", XSD::String.iri_s()),
            ),
            Triple::new(
                employee,
                b.iri(p("hasSalary")),
                typed(&b, "1000.50", "http://www.w3.org/2001/XMLSchema#decimal"),
            ),
        ];

        assert_contains(&g, &expected);
        assert_eq!(g.len(), expected.len());
        assert!(objects(&g, RDF::Type.iri_s())
            .iter()
            .all(|o| o.as_iri().map(|i| i.local_name()) != Some("Person")));
    }

    #[test]
    fn test_override_child() {
        let g = map(
            r#"<Person xmlns="http://www.example.com/person"
                       xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
                 <address xsi:type="Employee"><salary>10</salary></address>
               </Person>"#,
        );

        let employee = ins("Employee_1");
        let linked = objects(&g, &p("hasAddress"));
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].as_iri().map(|i| &i[..]), Some(&employee[..]));
        assert_eq!(objects(&g, &p("hasSalary")).len(), 1);
    }

    #[test]
    fn test_override_does_not_propagate() {
        let g = map(
            r#"<Person xmlns="http://www.example.com/person"
                       xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
                       xsi:type="Employee">
                 <address><city>Izmir</city></address>
               </Person>"#,
        );

        assert_eq!(
            objects(&g, &p("hasAddress"))[0].as_iri().map(|i| &i[..]),
            Some(&ins("Address_1")[..])
        );
        assert_eq!(objects(&g, &p("hasCity")).len(), 1);
    }

    #[test]
    fn test_attributes() {
        let g = map(include_str!("../ont/xml/attributes.xml"));
        let b = Build::new();

        let person = b.iri(ins("Person_1"));
        let address = b.iri(ins("Address_1"));
        let expected = vec![
            Triple::new(person.clone(), b.iri(p("hasRef")), b.iri("urn:x")),
            Triple::new(
                person.clone(),
                b.iri(p("hasId")),
                typed(&b, "7", "http://www.w3.org/2001/XMLSchema#integer"),
            ),
            Triple::new(
                person,
                b.iri(p("hasNickname")),
                Literal::Simple {
                    literal: "Al".into(),
                },
            ),
            Triple::new(
                address.clone(),
                b.iri(p("hasId")),
                Literal::Simple {
                    literal: "12".into(),
                },
            ),
            Triple::new(
                address,
                b.iri(p("hasPostcode")),
                typed(&b, "06100", &p("PostcodeDatatype")),
            ),
        ];
        assert_contains(&g, &expected);

        // Nothing for xsi:schemaLocation, nor for attributes of
        // datatype valued elements
        assert!(objects(&g, &p("hasSchemaLocation")).is_empty());
        assert!(objects(&g, &p("hasLang")).is_empty());
        assert_eq!(objects(&g, &p("hasNickname")).len(), 1);
    }

    #[test]
    fn test_relative_any_uri() {
        let g = map(r#"<Person xmlns="http://www.example.com/person" ref="people/7"/>"#);

        assert_eq!(
            objects(&g, &p("hasRef"))[0].as_iri().map(|i| &i[..]),
            Some("http://www.example.org/people/7")
        );
    }

    #[test]
    fn test_invalid_any_uri() {
        let g = map(r#"<Person xmlns="http://www.example.com/person" ref="a b"/>"#);

        let refs = objects(&g, &p("hasRef"));
        let literal = refs[0].as_literal().unwrap();
        assert_eq!(literal.literal(), "a b");
        assert_eq!(
            literal.datatype().map(|d| &d[..]),
            Some(XSD::AnyURI.iri_s())
        );
    }

    #[test]
    fn test_mixed_content() {
        let g = map(include_str!("../ont/xml/note.xml"));
        let b = Build::new();

        let note = b.iri(ins("Note_1"));
        let text = objects(&g, &p("hasTextContent"));
        assert_eq!(text.len(), 2);

        assert_contains(
            &g,
            &[
                Triple::new(
                    note.clone(),
                    b.iri(p("hasTextContent")),
                    typed(&b, "Call", XSD::String.iri_s()),
                ),
                Triple::new(
                    note.clone(),
                    b.iri(p("hasTextContent")),
                    typed(&b, "please", XSD::String.iri_s()),
                ),
                Triple::new(
                    note,
                    b.iri(p("hasEmphasis")),
                    typed(&b, "soon", XSD::String.iri_s()),
                ),
            ],
        );

        // Person is not mixed, and hobby is not a property
        assert!(g.about(&ins("Person_1")).all(|t| !t.predicate.ends_with("TextContent")));
        assert!(objects(&g, &p("hasHobby")).is_empty());
    }

    #[test]
    fn test_unique_identifiers() {
        let g = map(
            r#"<Person xmlns="http://www.example.com/person">
                 <address/><address/><address><city>Ankara</city></address>
               </Person>"#,
        );

        let addresses: Vec<_> = objects(&g, &p("hasAddress"))
            .into_iter()
            .filter_map(Object::as_iri)
            .map(|i| i.to_string())
            .collect();

        assert_eq!(
            addresses,
            vec![ins("Address_1"), ins("Address_2"), ins("Address_3")]
        );
    }

    #[test]
    fn test_object_triples_match_elements() {
        let t = "http://www.example.com/tree#";
        let tree = |s: &str| format!("{}{}", t, s);
        let ont = SchemaOntologyBuilder::new()
            .class(&tree("Root"))
            .class(&tree("Branch"))
            .class(&tree("Leaf"))
            .object_property(&tree("hasBranch"))
            .object_property(&tree("hasLeaf"))
            .all_values_from(&tree("Root"), &tree("hasBranch"), &tree("Branch"))
            .all_values_from(&tree("Branch"), &tree("hasBranch"), &tree("Branch"))
            .all_values_from(&tree("Branch"), &tree("hasLeaf"), &tree("Leaf"))
            .build()
            .unwrap();

        let g = map_with(
            r#"<Root xmlns="http://www.example.com/tree">
                 <branch><leaf/><branch><leaf/><leaf/></branch></branch>
                 <branch/>
               </Root>"#,
            &ont,
        )
        .unwrap();

        let object_triples = g
            .triples()
            .filter(|t| &*t.predicate != RDF::Type.iri_s())
            .filter(|t| t.object.as_iri().is_some())
            .count();
        assert_eq!(object_triples, 6);
    }

    #[test]
    fn test_unknown_root() {
        let r = map_with(
            r#"<Dog xmlns="http://www.example.com/person"/>"#,
            &person(),
        );

        let e = r.unwrap_err();
        assert!(matches!(
            e,
            Xml2OwlError::TraversalError { ref source, .. }
                if matches!(**source, Xml2OwlError::MappingError(_))
        ));
        assert_eq!(e.node_path(), vec!["<Dog>"]);
    }

    #[test]
    fn test_root_override_must_be_class() {
        let r = map_with(
            r#"<Person xmlns="http://www.example.com/person"
                       xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
                       xmlns:xs="http://www.w3.org/2001/XMLSchema"
                       xsi:type="xs:string"/>"#,
            &person(),
        );
        assert!(r.is_err());
    }

    #[test]
    fn test_error_path() {
        let r = map_with(
            r#"<Person xmlns="http://www.example.com/person"
                       xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
                 <name>Alice</name>
                 <address><city xsi:type="q:Town">Ankara</city></address>
               </Person>"#,
            &person(),
        );

        let e = r.unwrap_err();
        assert_eq!(e.node_path(), vec!["<Person>", "<address>", "<city>"]);
    }

    #[test]
    fn test_explicit_namespace() {
        let doc = xml::read(
            r#"<Person xmlns="http://www.example.com/elsewhere"><name>Alice</name></Person>"#
                .as_bytes(),
        )
        .unwrap();

        let config = MapperConfiguration {
            base: "http://data.example.com/run".to_string(),
            namespace: Some(NamespaceBinding {
                namespace: P.to_string(),
                prefix: "per".to_string(),
            }),
            nonce: Some(1),
        };
        let g = convert(&doc, &person(), config).unwrap();

        assert_eq!(g.namespaces().namespace("per"), Some(P));
        assert!(g.contains(&Triple::new(
            Build::new().iri("http://data.example.com/run#INS1_Person_1"),
            Build::new().iri(p("hasName")),
            typed(&Build::new(), "Alice", XSD::String.iri_s()),
        )));
    }

    #[test]
    fn test_runs_are_independent() {
        let doc = xml::read(include_str!("../ont/xml/person.xml").as_bytes()).unwrap();
        let ont = person();

        let first = convert(&doc, &ont, config()).unwrap();
        let second = convert(&doc, &ont, config()).unwrap();

        // Counters restart with each mapper
        assert!(second.about(&ins("Person_1")).count() > 0);
        assert_eq!(first.len(), second.len());
    }
}
