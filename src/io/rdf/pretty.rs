//! Write a schema ontology as RDF/XML.
//!
//! Blank node structures such as restrictions and `owl:oneOf` lists
//! are nested inline by `pretty_rdf`.
use pretty_rdf::{ChunkedRdfXmlFormatterConfig, PTriple, PrettyRdfXmlFormatter, RdfXmlFormatter};

use crate::error::Xml2OwlError;
use crate::ontology::schema::SchemaOntology;
use crate::ontology::OntologyModel;
use crate::vocab::Namespace;

use std::io::Write;

pub fn write<W: Write>(write: W, ont: &SchemaOntology) -> Result<(), Xml2OwlError> {
    // pretty_rdf keys its prefixes by namespace
    let mut p = indexmap::IndexMap::new();
    p.insert(Namespace::OWL.iri_s().to_string(), "owl".to_string());
    p.insert(Namespace::RDFS.iri_s().to_string(), "rdfs".to_string());
    p.insert(Namespace::XSD.iri_s().to_string(), "xsd".to_string());
    for (prefix, ns) in ont.namespaces().prefixes() {
        if !p.contains_key(ns) && prefix != "rdf" {
            p.insert(ns.to_string(), prefix.to_string());
        }
    }

    let mut f: PrettyRdfXmlFormatter<String, _> =
        PrettyRdfXmlFormatter::new(write, ChunkedRdfXmlFormatterConfig::all().prefix(p))?;

    for t in ont.triples() {
        let rt: rio_api::model::Triple = t.into();
        f.format(PTriple::from(rt))?;
    }

    f.finish()?;
    Ok(())
}
