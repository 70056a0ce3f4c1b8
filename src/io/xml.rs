//! A namespace aware element tree for XML instance documents.
//!
//! The tree keeps everything the mapper needs to know about a node:
//! its resolved namespace, its prefix as written, its attributes and
//! the namespace declarations in scope (for resolving `xsi:type`
//! values).
use quick_xml::escape::unescape;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::error::*;
use crate::vocab::Namespace;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::io::BufRead;
use std::rc::Rc;

/// Prefix to namespace bindings, the empty prefix holding the default.
pub type Scope = BTreeMap<String, String>;

#[derive(Debug)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn root(&self) -> &Element {
        &self.root
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local_name: String,
    pub value: String,
}

impl Attribute {
    pub fn is_in(&self, ns: Namespace) -> bool {
        self.namespace.as_deref() == Some(ns.iri_s())
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(p) => write!(f, "@{}:{}=\"{}\"", p, self.local_name, self.value),
            None => write!(f, "@{}=\"{}\"", self.local_name, self.value),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction(String),
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Element(e) => e.fmt(f),
            Node::Text(t) => write!(f, "text {:?}", t.trim()),
            Node::Comment(_) => write!(f, "comment"),
            Node::ProcessingInstruction(_) => write!(f, "processing instruction"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Element {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local_name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    scope: Rc<Scope>,
}

impl Element {
    /// The value of the attribute `local_name` in namespace `ns`.
    pub fn attribute_ns(&self, ns: Namespace, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.is_in(ns) && a.local_name == local_name)
            .map(|a| &a.value[..])
    }

    /// The namespace bound to `prefix` where this element is declared,
    /// the empty prefix giving the default namespace.
    pub fn lookup_namespace(&self, prefix: &str) -> Option<&str> {
        match prefix {
            "xml" => Some(Namespace::XML.iri_s()),
            _ => self.scope.get(prefix).map(|s| &s[..]),
        }
    }

    /// All namespace declarations in scope at this element.
    pub fn namespaces(&self) -> &Scope {
        &self.scope
    }

    /// The direct text content of this element, including CDATA, but
    /// not the text of descendants.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(&t[..]),
                _ => None,
            })
            .collect()
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(p) => write!(f, "<{}:{}>", p, self.local_name),
            None => write!(f, "<{}>", self.local_name),
        }
    }
}

/// Read an XML document into an element tree.
///
/// Fails on malformed XML, on undeclared prefixes and on documents
/// without a root element.
pub fn read<R: BufRead>(bufread: R) -> Result<Document, Xml2OwlError> {
    let mut reader: NsReader<R> = NsReader::from_reader(bufread);
    let mut buf = Vec::new();

    // Elements which have been opened but not yet closed
    let mut open: Vec<Element> = vec![];
    let mut root: Option<Element> = None;

    loop {
        let pos = reader.buffer_position();
        let (ns, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| Xml2OwlError::ParserError(e.into(), pos.into()))?;

        let namespace = match event {
            Event::Start(_) | Event::Empty(_) => resolved_namespace(ns, pos)?,
            _ => None,
        };

        match event {
            Event::Start(ref e) => {
                let scope = open.last().map(|p| p.scope.clone()).unwrap_or_default();
                let element = element_from_start(&reader, namespace, e, scope, pos)?;
                open.push(element);
            }
            Event::Empty(ref e) => {
                let scope = open.last().map(|p| p.scope.clone()).unwrap_or_default();
                let element = element_from_start(&reader, namespace, e, scope, pos)?;
                close(&mut open, &mut root, element, pos)?;
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| Xml2OwlError::invalid_at("Unexpected closing tag", pos))?;
                close(&mut open, &mut root, element, pos)?;
            }
            Event::Text(ref t) => {
                let text = t.unescape()?.into_owned();
                push_child(&mut open, Node::Text(text));
            }
            Event::CData(ref c) => {
                let text = reader.decoder().decode(c)?.into_owned();
                push_child(&mut open, Node::Text(text));
            }
            Event::Comment(ref c) => {
                let text = reader.decoder().decode(c)?.into_owned();
                push_child(&mut open, Node::Comment(text));
            }
            Event::PI(ref p) => {
                let text = reader.decoder().decode(p)?.into_owned();
                push_child(&mut open, Node::ProcessingInstruction(text));
            }
            Event::Eof => {
                if !open.is_empty() {
                    return Err(Xml2OwlError::invalid_at(
                        format!("Unexpected EoF inside {}", open[open.len() - 1]),
                        pos,
                    ));
                }
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    root.map(|root| Document { root })
        .ok_or_else(|| invalid!("Document has no root element"))
}

fn push_child(open: &mut [Element], node: Node) {
    // Content outside of the root element is only whitespace,
    // comments or processing instructions.
    if let Some(parent) = open.last_mut() {
        parent.children.push(node);
    }
}

fn close(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    pos: usize,
) -> Result<(), Xml2OwlError> {
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(Xml2OwlError::invalid_at(
            format!("Second root element {}", element),
            pos,
        )),
    }
}

/// The namespace of an element as resolved by the reader.
///
/// This takes the result by value, so that the borrow of the reader
/// ends here.
fn resolved_namespace(ns: ResolveResult, pos: usize) -> Result<Option<String>, Xml2OwlError> {
    let utf8 = |b: &[u8]| {
        std::str::from_utf8(b)
            .map(|s| s.to_string())
            .map_err(|e| Xml2OwlError::ParserError(e.into(), pos.into()))
    };

    match ns {
        ResolveResult::Bound(ns) => Ok(Some(utf8(ns.as_ref())?)),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(p) => Err(Xml2OwlError::invalid_at(
            format!("Unknown prefix: {}", utf8(&p)?),
            pos,
        )),
    }
}

fn element_from_start<R>(
    reader: &NsReader<R>,
    namespace: Option<String>,
    e: &BytesStart,
    parent_scope: Rc<Scope>,
    pos: usize,
) -> Result<Element, Xml2OwlError> {
    let decoder = reader.decoder();

    let name = e.name();
    let prefix = match name.prefix() {
        Some(p) => Some(decoder.decode(p.as_ref())?.into_owned()),
        None => None,
    };
    let local_name = decoder.decode(e.local_name().as_ref())?.into_owned();

    // First pass over the attributes collects namespace declarations,
    // which are in scope for the attributes of the same element.
    let mut declared: Vec<(String, String)> = vec![];
    let mut raw: Vec<(String, String)> = vec![];
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = decoder.decode(attr.key.as_ref())?.into_owned();
        let value = unescape(&decoder.decode(&attr.value)?)?.into_owned();

        if key == "xmlns" {
            declared.push((String::new(), value));
        } else if let Some(p) = key.strip_prefix("xmlns:") {
            declared.push((p.to_string(), value));
        } else {
            raw.push((key, value));
        }
    }

    let scope = if declared.is_empty() {
        parent_scope
    } else {
        let mut scope = (*parent_scope).clone();
        for (p, v) in declared {
            if v.is_empty() {
                // xmlns="" undeclares the default namespace
                scope.remove(&p);
            } else {
                scope.insert(p, v);
            }
        }
        Rc::new(scope)
    };

    let mut attributes = vec![];
    for (key, value) in raw {
        let (prefix, local_name) = match key.split_once(':') {
            Some((p, l)) => (Some(p.to_string()), l.to_string()),
            None => (None, key),
        };

        // Unprefixed attributes are in no namespace
        let namespace = match &prefix {
            Some(p) if p == "xml" => Some(Namespace::XML.iri_s().to_string()),
            Some(p) => Some(scope.get(p).cloned().ok_or_else(|| {
                Xml2OwlError::invalid_at(format!("Unknown prefix: {}", p), pos)
            })?),
            None => None,
        };

        attributes.push(Attribute {
            namespace,
            prefix,
            local_name,
            value,
        });
    }

    Ok(Element {
        namespace,
        prefix,
        local_name,
        attributes,
        children: vec![],
        scope,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read_ok(s: &str) -> Document {
        let r = read(s.as_bytes());
        assert!(r.is_ok(), "Expected document, got failure:{:?}", r.err());
        r.unwrap()
    }

    #[test]
    fn test_simple_document() {
        let doc = read_ok(include_str!("../ont/xml/person.xml"));
        let root = doc.root();

        assert_eq!(root.local_name, "Person");
        assert_eq!(
            root.namespace.as_deref(),
            Some("http://www.example.com/person")
        );
        assert_eq!(root.prefix, None);

        let children: Vec<_> = root.child_elements().map(|e| &e.local_name[..]).collect();
        assert_eq!(children, vec!["name", "address"]);
    }

    #[test]
    fn test_namespaced_attribute() {
        let doc = read_ok(
            r#"<p:Person xmlns:p="http://www.example.com/person"
                         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
                         xsi:type="p:Employee" id="7"/>"#,
        );
        let root = doc.root();

        assert_eq!(root.prefix.as_deref(), Some("p"));
        assert_eq!(root.attribute_ns(Namespace::XSI, "type"), Some("p:Employee"));
        assert_eq!(root.attributes.len(), 2);
        assert_eq!(root.attributes[1].namespace, None);
        assert_eq!(
            root.lookup_namespace("p"),
            Some("http://www.example.com/person")
        );
    }

    #[test]
    fn test_text_and_cdata() {
        let doc = read_ok("<a>x &amp; <![CDATA[<y>]]><!-- c --><b/>z</a>");
        let root = doc.root();

        assert_eq!(root.text(), "x & <y>z");
        assert!(matches!(root.children[2], Node::Comment(_)));
    }

    #[test]
    fn test_scope_is_inherited() {
        let doc = read_ok(
            r#"<a xmlns="http://a" xmlns:q="http://q"><b xmlns="http://b"><c/></b></a>"#,
        );
        let b = doc.root().child_elements().next().unwrap();
        let c = b.child_elements().next().unwrap();

        assert_eq!(c.namespace.as_deref(), Some("http://b"));
        assert_eq!(c.lookup_namespace(""), Some("http://b"));
        assert_eq!(c.lookup_namespace("q"), Some("http://q"));
    }

    #[test]
    fn test_malformed() {
        assert!(read("<a><b></a>".as_bytes()).is_err());
        assert!(read("<a>".as_bytes()).is_err());
        assert!(read("".as_bytes()).is_err());
        assert!(read("<u:a/>".as_bytes()).is_err());
    }
}
