//! RDF/XML reading and writing.
//!
//! `reader` loads a schema ontology, `writer` writes instance graphs
//! and `pretty` writes the ontology back out.
pub mod pretty;
pub mod reader;
pub mod writer;
