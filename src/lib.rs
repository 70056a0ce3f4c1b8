//! # xml2owl
//!
//! Map XML instance documents onto RDF graphs, guided by an OWL
//! ontology describing their schema.
//!
//! The ontology is read from RDF/XML into a
//! [`SchemaOntology`](ontology::schema::SchemaOntology). Each element
//! of an instance document then becomes either a new resource, linked
//! from its parent by an object property, or a typed literal of a
//! datatype property, according to the `allValuesFrom` restrictions
//! of its parent's class.
//!
//! ```
//! use xml2owl::io::rdf::reader::{read, OntologyConfiguration};
//! use xml2owl::io::RdfFormat;
//! use xml2owl::{convert, MapperConfiguration};
//!
//! let ont = read(
//!     include_str!("ont/person.owl").as_bytes(),
//!     OntologyConfiguration::default(),
//! )
//! .unwrap();
//! let doc = xml2owl::io::xml::read(include_str!("ont/xml/person.xml").as_bytes()).unwrap();
//!
//! let graph = convert(&doc, &ont, MapperConfiguration::default()).unwrap();
//! assert_eq!(graph.len(), 5);
//!
//! let mut out = vec![];
//! graph.write(&mut out, RdfFormat::NTriple).unwrap();
//! ```
pub mod error;
pub mod graph;
pub mod io;
pub mod mapper;
pub mod model;
pub mod ontology;
pub mod vocab;

pub use mapper::{convert, MapperConfiguration, NamespaceBinding, XmlMapper};
