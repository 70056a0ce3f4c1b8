//! Write an instance graph as RDF/XML.
//!
//! The document carries an `xml:base` declaration for the graph's
//! base and `xmlns` declarations for every namespace used by a
//! predicate. Resources under the base are written relative to it.
use curie::PrefixMapping;
use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{invalid, Xml2OwlError};
use crate::graph::Graph;
use crate::model::*;
use crate::vocab::{is_ncname, split_iri, Namespace, RDF};

use std::io::Write as StdWrite;

/// Write `graph` to `write`.
///
/// With `abbrev`, a subject with exactly one `rdf:type` is written as
/// a typed node element rather than an `rdf:Description`.
pub fn write<W: StdWrite>(write: W, graph: &Graph, abbrev: bool) -> Result<(), Xml2OwlError> {
    let mut writer = Writer::new_with_indent(write, b' ', 4);
    let mut qnames = QNames::new(graph);

    let subjects = by_subject(graph);
    for t in graph.triples() {
        qnames.add(&t.predicate)?;
    }
    if abbrev {
        for triples in subjects.values() {
            if let Some(ty) = single_type(triples) {
                // Types which cannot be shortened stay as rdf:type
                qnames.add(ty).ok();
            }
        }
    }

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut elem = BytesStart::new("rdf:RDF");
    if let Some(default) = graph.namespaces().default_namespace() {
        elem.push_attribute(("xmlns", default));
    }
    for (prefix, ns) in qnames.prefixes() {
        elem.push_attribute((&format!("xmlns:{}", prefix)[..], &ns[..]));
    }
    if let Some(base) = graph.base() {
        elem.push_attribute(("xml:base", base));
    }
    let end = elem.to_end().into_owned();
    writer.write_event(Event::Start(elem))?;

    let base = graph.base().map(|b| format!("{}#", b));
    for (subject, triples) in &subjects {
        let node_type = if abbrev {
            single_type(triples).and_then(|ty| qnames.qname(ty).map(|q| (ty, q)))
        } else {
            None
        };

        let tag = match &node_type {
            Some((_, q)) => q.clone(),
            None => "rdf:Description".to_string(),
        };

        let mut node = BytesStart::new(&tag[..]);
        match subject {
            Subject::IRI(iri) => {
                node.push_attribute(("rdf:about", &relative(iri, base.as_deref())[..]))
            }
            Subject::BlankNode(bn) => node.push_attribute(("rdf:nodeID", bn.id())),
        }

        let properties: Vec<_> = triples
            .iter()
            .filter(|t| match &node_type {
                Some((ty, _)) => !is_type(t) || t.object.as_iri() != Some(*ty),
                None => true,
            })
            .collect();

        if properties.is_empty() {
            writer.write_event(Event::Empty(node))?;
            continue;
        }

        writer.write_event(Event::Start(node))?;
        for t in properties {
            write_property(&mut writer, &qnames, t, base.as_deref())?;
        }
        writer.write_event(Event::End(BytesEnd::new(&tag[..])))?;
    }

    writer.write_event(Event::End(end))?;
    Ok(())
}

fn write_property<W: StdWrite>(
    writer: &mut Writer<W>,
    qnames: &QNames,
    t: &Triple,
    base: Option<&str>,
) -> Result<(), Xml2OwlError> {
    let tag = qnames
        .qname(&t.predicate)
        .ok_or_else(|| invalid!("Cannot write {} as an element name", t.predicate))?;
    let mut elem = BytesStart::new(&tag[..]);

    match &t.object {
        Object::IRI(iri) => {
            elem.push_attribute(("rdf:resource", &relative(iri, base)[..]));
            writer.write_event(Event::Empty(elem))?;
        }
        Object::BlankNode(bn) => {
            elem.push_attribute(("rdf:nodeID", bn.id()));
            writer.write_event(Event::Empty(elem))?;
        }
        Object::Literal(l) => {
            match l {
                Literal::Simple { .. } => {}
                Literal::Language { lang, .. } => elem.push_attribute(("xml:lang", &lang[..])),
                Literal::Datatype { datatype_iri, .. } => {
                    elem.push_attribute(("rdf:datatype", &datatype_iri[..]))
                }
            }
            writer.write_event(Event::Start(elem))?;
            writer.write_event(Event::Text(BytesText::new(l.literal())))?;
            writer.write_event(Event::End(BytesEnd::new(&tag[..])))?;
        }
    }

    Ok(())
}

fn by_subject(graph: &Graph) -> IndexMap<&Subject, Vec<&Triple>> {
    let mut subjects: IndexMap<&Subject, Vec<&Triple>> = IndexMap::new();
    for t in graph.triples() {
        subjects.entry(&t.subject).or_default().push(t);
    }
    subjects
}

fn is_type(t: &Triple) -> bool {
    &*t.predicate == RDF::Type.iri_s()
}

fn single_type<'a>(triples: &[&'a Triple]) -> Option<&'a IRI> {
    let mut types = triples.iter().filter(|t| is_type(t)).map(|t| t.object.as_iri());
    match (types.next(), types.next()) {
        (Some(Some(ty)), None) => Some(ty),
        _ => None,
    }
}

/// `iri` relative to `base`, when it is a fragment of it.
fn relative(iri: &str, base: Option<&str>) -> String {
    match base.and_then(|b| iri.strip_prefix(b)) {
        Some(fragment) if !fragment.is_empty() => format!("#{}", fragment),
        _ => iri.to_string(),
    }
}

/// Namespace to prefix bindings for element names.
struct QNames {
    mapping: PrefixMapping,
    generated: usize,
}

impl QNames {
    fn new(graph: &Graph) -> QNames {
        let mut mapping = PrefixMapping::default();
        mapping.add_prefix("rdf", Namespace::RDF.iri_s()).ok();

        // The default namespace is left out, so every element name
        // carries a prefix
        for (prefix, ns) in graph.namespaces().prefix_mapping().mappings() {
            if is_ncname(prefix)
                && !prefix.to_ascii_lowercase().starts_with("xml")
                && !mapping.mappings().any(|(p, n)| p == prefix || n == ns)
            {
                mapping.add_prefix(prefix, ns).ok();
            }
        }

        QNames {
            mapping,
            generated: 0,
        }
    }

    fn prefixes(&self) -> impl Iterator<Item = (&String, &String)> {
        self.mapping.mappings()
    }

    fn qname(&self, iri: &str) -> Option<String> {
        if let Ok(curie) = self.mapping.shrink_iri(iri) {
            let curie = curie.to_string();
            if curie.split_once(':').map_or(false, |(_, local)| is_ncname(local)) {
                return Some(curie);
            }
        }

        // A shorter namespace can shadow the one which makes a QName
        let (ns, local) = split_iri(iri)?;
        self.mapping
            .mappings()
            .find(|(_, n)| *n == ns)
            .map(|(p, _)| format!("{}:{}", p, local))
    }

    /// Make sure `iri` can be written as a QName, binding a new prefix
    /// to its namespace if need be.
    fn add(&mut self, iri: &str) -> Result<(), Xml2OwlError> {
        if self.qname(iri).is_some() {
            return Ok(());
        }

        let ns = match split_iri(iri) {
            Some((ns, _)) if !ns.is_empty() => ns,
            _ => return Err(invalid!("Cannot write {} as an element name", iri)),
        };

        let prefix = loop {
            let candidate = format!("ns{}", self.generated);
            self.generated += 1;
            if !self.mapping.mappings().any(|(p, _)| p == &candidate) {
                break candidate;
            }
        };

        self.mapping
            .add_prefix(&prefix, ns)
            .map_err(|_| invalid!("Cannot bind prefix {}", prefix))
    }
}
