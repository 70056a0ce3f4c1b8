//! Read a schema ontology from RDF/XML.
//!
//! Triples come from `rio_xml`; the namespace declarations on the
//! root element, which `rio_xml` does not report, are collected
//! separately so they can be copied into instance graphs.
use log::debug;
use rio_api::parser::TriplesParser;
use rio_xml::RdfXmlParser;

use crate::error::{invalid, Xml2OwlError};
use crate::graph::NamespaceTable;
use crate::io::xml;
use crate::model::*;

pub use crate::ontology::schema::OntologyConfiguration;
use crate::ontology::schema::SchemaOntology;

use std::io::BufRead;

pub fn read<R: BufRead>(
    mut bufread: R,
    config: OntologyConfiguration,
) -> Result<SchemaOntology, Xml2OwlError> {
    let b = Build::new();
    read_with_build(&mut bufread, &b, config)
}

pub fn read_with_build<R: BufRead>(
    bufread: &mut R,
    build: &Build,
    config: OntologyConfiguration,
) -> Result<SchemaOntology, Xml2OwlError> {
    // Read twice, once for triples and once for prefixes
    let mut bytes = vec![];
    bufread.read_to_end(&mut bytes)?;

    let namespaces = prefixes(&bytes)?;

    let mut triples = vec![];
    RdfXmlParser::new(&bytes[..], None).parse_all(&mut |t| -> Result<(), Xml2OwlError> {
        triples.push(to_triple(build, t)?);
        Ok(())
    })?;

    debug!(
        "Read {} triples and {} prefixes",
        triples.len(),
        namespaces.len()
    );

    SchemaOntology::from_triples(triples, namespaces, config)
}

fn prefixes(bytes: &[u8]) -> Result<NamespaceTable, Xml2OwlError> {
    let doc = xml::read(bytes)?;
    let mut nt = NamespaceTable::new();

    for (prefix, ns) in doc.root().namespaces() {
        nt.add_prefix(prefix, ns);
    }

    Ok(nt)
}

fn to_triple(b: &Build, t: rio_api::model::Triple) -> Result<Triple, Xml2OwlError> {
    use rio_api::model as rio;

    let subject: Subject = match t.subject {
        rio::Subject::NamedNode(nn) => b.iri(nn.iri).into(),
        rio::Subject::BlankNode(bn) => b.blank(bn.id).into(),
        rio::Subject::Triple(_) => return Err(invalid!("Unexpected quoted triple: {}", t)),
    };

    let object: Object = match t.object {
        rio::Term::NamedNode(nn) => b.iri(nn.iri).into(),
        rio::Term::BlankNode(bn) => b.blank(bn.id).into(),
        rio::Term::Literal(rio::Literal::Simple { value }) => Literal::Simple {
            literal: value.to_string(),
        }
        .into(),
        rio::Term::Literal(rio::Literal::LanguageTaggedString { value, language }) => {
            Literal::Language {
                literal: value.to_string(),
                lang: language.to_string(),
            }
            .into()
        }
        rio::Term::Literal(rio::Literal::Typed { value, datatype }) => Literal::Datatype {
            literal: value.to_string(),
            datatype_iri: b.iri(datatype.iri),
        }
        .into(),
        rio::Term::Triple(_) => return Err(invalid!("Unexpected quoted triple: {}", t)),
    };

    Ok(Triple::new(subject, b.iri(t.predicate.iri), object))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ontology::{OntologyModel, SuperClass};

    use pretty_assertions::assert_eq;

    const P: &str = "http://www.example.com/person#";

    fn read_ok(s: &str) -> SchemaOntology {
        let r = read(s.as_bytes(), OntologyConfiguration::default());
        assert!(r.is_ok(), "Expected ontology, got failure:{:?}", r.err());
        r.unwrap()
    }

    #[test]
    fn test_person() {
        let ont = read_ok(include_str!("../../ont/person.owl"));

        let person = ont.class(&format!("{}Person", P)).unwrap();
        assert!(person.is_class());

        let names: Vec<_> = person
            .superclasses()
            .iter()
            .filter_map(SuperClass::as_restriction)
            .filter_map(|r| r.property().ok())
            .map(|p| p.local_name())
            .collect();
        assert!(names.contains(&"hasName"));
        assert!(names.contains(&"hasAddress"));

        let employee = ont.class(&format!("{}Employee", P)).unwrap();
        assert!(employee
            .superclasses()
            .iter()
            .any(|sc| sc.as_named().map(|i| i.local_name()) == Some("Person")));
    }

    #[test]
    fn test_datatypes_and_properties() {
        let ont = read_ok(include_str!("../../ont/person.owl"));
        let b = Build::new();

        assert!(ont
            .class(&format!("{}PostcodeDatatype", P))
            .unwrap()
            .is_datatype());
        assert!(ont
            .property_kind(&b.iri(format!("{}hasAddress", P)))
            .is_object());
        assert!(ont
            .property_kind(&b.iri(format!("{}hasName", P)))
            .is_datatype());
    }

    #[test]
    fn test_prefixes() {
        let ont = read_ok(include_str!("../../ont/person.owl"));

        assert_eq!(ont.namespaces().namespace("person"), Some(P));
        assert_eq!(ont.namespaces().default_namespace(), Some(P));
        assert_eq!(
            ont.namespaces().namespace("xsd"),
            Some("http://www.w3.org/2001/XMLSchema#")
        );
    }

    #[test]
    fn test_mixed() {
        let ont = read_ok(include_str!("../../ont/person.owl"));
        let b = Build::new();

        assert!(ont.is_mixed_class(&b.iri(format!("{}Note", P))));
        assert!(!ont.is_mixed_class(&b.iri(format!("{}Person", P))));
    }

    #[test]
    fn test_not_rdf() {
        assert!(read("<a><b></a>".as_bytes(), OntologyConfiguration::default()).is_err());
    }
}
