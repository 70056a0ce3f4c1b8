//! Data structures shared by the ontology, the mapper and the output graph.
//!
//! RDF terms are kept deliberately small: IRIs are reference counted
//! strings, interned through a [`Build`] so that the many repeated
//! predicate and class IRIs of a mapping share storage.
use std::borrow::Borrow;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::rc::Rc;

use crate::vocab::{self, XSD};

/// An [IRI](https://en.wikipedia.org/wiki/Internationalized_Resource_Identifier)
///
/// Create these with a [`Build`] to reuse storage for equal IRIs.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct IRI(Rc<str>);

impl IRI {
    /// The local part of this IRI, after the last `#` or `/`.
    pub fn local_name(&self) -> &str {
        vocab::local_name(&self.0)
    }
}

impl Deref for IRI {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for IRI {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for IRI {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for IRI {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&IRI> for String {
    fn from(i: &IRI) -> String {
        i.0.to_string()
    }
}

impl From<IRI> for String {
    fn from(i: IRI) -> String {
        i.0.to_string()
    }
}

/// Build and cache IRIs.
///
/// `Build` hands out the same underlying storage for equal strings.
#[derive(Debug, Default)]
pub struct Build(RefCell<BTreeSet<IRI>>);

impl Build {
    pub fn new() -> Build {
        Build::default()
    }

    /// Constructs a new `IRI`
    ///
    /// # Examples
    /// ```
    /// # use xml2owl::model::*;
    /// let b = Build::new();
    /// let iri = b.iri("http://www.example.com");
    ///
    /// assert_eq!("http://www.example.com", &*iri);
    /// ```
    pub fn iri<S: Borrow<str>>(&self, s: S) -> IRI {
        let mut cache = self.0.borrow_mut();
        if let Some(iri) = cache.get(s.borrow()) {
            return iri.clone();
        }

        let iri = IRI(Rc::from(s.borrow()));
        cache.insert(iri.clone());
        iri
    }

    /// Constructs a new `BlankNode`.
    pub fn blank<S: Borrow<str>>(&self, id: S) -> BlankNode {
        BlankNode(Rc::from(id.borrow()))
    }

    /// The number of distinct IRIs built so far.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BlankNode(Rc<str>);

impl BlankNode {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl Display for BlankNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// An RDF literal.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Literal {
    /// A literal with neither datatype nor language.
    Simple { literal: String },
    /// A language tagged literal.
    Language { literal: String, lang: String },
    /// A literal with an explicit datatype.
    Datatype { literal: String, datatype_iri: IRI },
}

impl Literal {
    pub fn literal(&self) -> &str {
        match self {
            Literal::Simple { literal } => literal,
            Literal::Language { literal, .. } => literal,
            Literal::Datatype { literal, .. } => literal,
        }
    }

    pub fn datatype(&self) -> Option<&IRI> {
        match self {
            Literal::Datatype { datatype_iri, .. } => Some(datatype_iri),
            _ => None,
        }
    }
}

/// The subject of a triple.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Subject {
    IRI(IRI),
    BlankNode(BlankNode),
}

impl From<IRI> for Subject {
    fn from(iri: IRI) -> Self {
        Subject::IRI(iri)
    }
}

impl From<BlankNode> for Subject {
    fn from(bn: BlankNode) -> Self {
        Subject::BlankNode(bn)
    }
}

/// The object of a triple.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Object {
    IRI(IRI),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl Object {
    pub fn as_iri(&self) -> Option<&IRI> {
        match self {
            Object::IRI(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_blank(&self) -> Option<&BlankNode> {
        match self {
            Object::BlankNode(bn) => Some(bn),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Object::Literal(l) => Some(l),
            _ => None,
        }
    }
}

impl From<IRI> for Object {
    fn from(iri: IRI) -> Self {
        Object::IRI(iri)
    }
}

impl From<BlankNode> for Object {
    fn from(bn: BlankNode) -> Self {
        Object::BlankNode(bn)
    }
}

impl From<Literal> for Object {
    fn from(l: Literal) -> Self {
        Object::Literal(l)
    }
}

impl From<Subject> for Object {
    fn from(s: Subject) -> Self {
        match s {
            Subject::IRI(iri) => Object::IRI(iri),
            Subject::BlankNode(bn) => Object::BlankNode(bn),
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Triple {
    pub subject: Subject,
    pub predicate: IRI,
    pub object: Object,
}

impl Triple {
    pub fn new<S: Into<Subject>, O: Into<Object>>(subject: S, predicate: IRI, object: O) -> Triple {
        Triple {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

impl<'a> From<&'a Subject> for rio_api::model::Subject<'a> {
    fn from(s: &'a Subject) -> Self {
        match s {
            Subject::IRI(iri) => rio_api::model::NamedNode { iri: iri }.into(),
            Subject::BlankNode(bn) => rio_api::model::BlankNode { id: bn.id() }.into(),
        }
    }
}

impl<'a> From<&'a Literal> for rio_api::model::Literal<'a> {
    fn from(l: &'a Literal) -> Self {
        match l {
            Literal::Simple { literal } => rio_api::model::Literal::Simple { value: literal },
            Literal::Language { literal, lang } => rio_api::model::Literal::LanguageTaggedString {
                value: literal,
                language: lang,
            },
            Literal::Datatype {
                literal,
                datatype_iri,
            } => rio_api::model::Literal::Typed {
                value: literal,
                datatype: rio_api::model::NamedNode { iri: datatype_iri },
            },
        }
    }
}

impl<'a> From<&'a Object> for rio_api::model::Term<'a> {
    fn from(o: &'a Object) -> Self {
        match o {
            Object::IRI(iri) => rio_api::model::NamedNode { iri: iri }.into(),
            Object::BlankNode(bn) => rio_api::model::BlankNode { id: bn.id() }.into(),
            Object::Literal(l) => rio_api::model::Literal::from(l).into(),
        }
    }
}

impl<'a> From<&'a Triple> for rio_api::model::Triple<'a> {
    fn from(t: &'a Triple) -> Self {
        rio_api::model::Triple {
            subject: (&t.subject).into(),
            predicate: rio_api::model::NamedNode { iri: &t.predicate },
            object: (&t.object).into(),
        }
    }
}

/// The resolved range of a property.
///
/// `target` is either a datatype IRI (`datatype` is true) or the IRI of
/// an ontology class.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TypedResource {
    pub datatype: bool,
    pub target: IRI,
}

impl TypedResource {
    pub fn datatype(target: IRI) -> TypedResource {
        TypedResource {
            datatype: true,
            target,
        }
    }

    pub fn class(target: IRI) -> TypedResource {
        TypedResource {
            datatype: false,
            target,
        }
    }

    pub fn is_datatype(&self) -> bool {
        self.datatype
    }

    /// True if this resource is the `xsd:anyURI` datatype, whose values
    /// are written as resources rather than literals.
    pub fn is_any_uri(&self) -> bool {
        self.datatype && &*self.target == XSD::AnyURI.iri_s()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_iri_creation() {
        let b = Build::new();

        let iri1 = b.iri("http://example.com".to_string());
        let iri2 = b.iri("http://example.com");

        // these are equal to each other
        assert_eq!(iri1, iri2);

        // these are the same object in memory
        assert!(Rc::ptr_eq(&iri1.0, &iri2.0));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_iri_string() {
        let b = Build::new();
        let iri = b.iri("http://www.example.com/person#Person");

        assert_eq!(String::from(&iri), "http://www.example.com/person#Person");
        assert_eq!(iri.local_name(), "Person");
    }

    #[test]
    fn test_any_uri() {
        let b = Build::new();

        assert!(TypedResource::datatype(b.iri(XSD::AnyURI.iri_s())).is_any_uri());
        assert!(!TypedResource::datatype(b.iri(XSD::String.iri_s())).is_any_uri());
        assert!(!TypedResource::class(b.iri(XSD::AnyURI.iri_s())).is_any_uri());
    }

    #[test]
    fn test_rio_triple() {
        let b = Build::new();
        let t = Triple::new(
            b.iri("http://www.example.com/s"),
            b.iri("http://www.example.com/p"),
            Literal::Datatype {
                literal: "Alice".into(),
                datatype_iri: b.iri(XSD::String.iri_s()),
            },
        );

        let rio: rio_api::model::Triple = (&t).into();
        assert_eq!(
            rio.to_string(),
            "<http://www.example.com/s> <http://www.example.com/p> \"Alice\"^^<http://www.w3.org/2001/XMLSchema#string>"
        );
    }
}
