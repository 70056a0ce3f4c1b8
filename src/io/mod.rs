//! Readers and writers for instance documents, ontologies and graphs.

pub mod nt;
pub mod rdf;
pub mod xml;

use crate::error::{invalid, Xml2OwlError};
use crate::graph::Graph;
use crate::ontology::schema::SchemaOntology;

use std::fmt::{Display, Formatter};
use std::io::Write;
use std::str::FromStr;

/// The RDF syntaxes a graph can be written in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RdfFormat {
    /// RDF/XML, one `rdf:Description` per subject.
    RdfXml,
    /// RDF/XML using typed node elements.
    RdfXmlAbbrev,
    NTriple,
    /// Written as Turtle, which is the subset of N3 other tools read.
    N3,
}

impl RdfFormat {
    pub fn all() -> Vec<RdfFormat> {
        vec![
            RdfFormat::RdfXml,
            RdfFormat::RdfXmlAbbrev,
            RdfFormat::NTriple,
            RdfFormat::N3,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            RdfFormat::RdfXml => "RDF/XML",
            RdfFormat::RdfXmlAbbrev => "RDF/XML-ABBREV",
            RdfFormat::NTriple => "N-TRIPLE",
            RdfFormat::N3 => "N3",
        }
    }
}

impl Default for RdfFormat {
    fn default() -> Self {
        RdfFormat::RdfXml
    }
}

impl Display for RdfFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RdfFormat {
    type Err = Xml2OwlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.to_ascii_uppercase()[..] {
            "RDF/XML" => Ok(RdfFormat::RdfXml),
            "RDF/XML-ABBREV" => Ok(RdfFormat::RdfXmlAbbrev),
            "N-TRIPLE" | "N-TRIPLES" | "NT" => Ok(RdfFormat::NTriple),
            "N3" | "TURTLE" | "TTL" => Ok(RdfFormat::N3),
            _ => Err(invalid!("Unknown RDF format: {}", s)),
        }
    }
}

/// Write an instance graph.
///
/// Both RDF/XML flavours declare the graph's base as `xml:base`.
pub fn write_graph<W: Write>(write: W, graph: &Graph, format: RdfFormat) -> Result<(), Xml2OwlError> {
    match format {
        RdfFormat::RdfXml => rdf::writer::write(write, graph, false),
        RdfFormat::RdfXmlAbbrev => rdf::writer::write(write, graph, true),
        RdfFormat::NTriple => nt::write_ntriples(write, graph.triples()),
        RdfFormat::N3 => nt::write_turtle(write, graph.triples()),
    }
}

/// Write the ontology itself, independently of any instance data.
pub fn write_ontology<W: Write>(
    write: W,
    ontology: &SchemaOntology,
    format: RdfFormat,
) -> Result<(), Xml2OwlError> {
    match format {
        RdfFormat::RdfXml | RdfFormat::RdfXmlAbbrev => rdf::pretty::write(write, ontology),
        RdfFormat::NTriple => nt::write_ntriples(write, ontology.triples()),
        RdfFormat::N3 => nt::write_turtle(write, ontology.triples()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_names() {
        for f in RdfFormat::all() {
            assert_eq!(f.name().parse::<RdfFormat>().unwrap(), f);
        }
        assert_eq!("turtle".parse::<RdfFormat>().unwrap(), RdfFormat::N3);
        assert!("JSON-LD".parse::<RdfFormat>().is_err());
    }
}
