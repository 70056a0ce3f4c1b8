//! Core RDF vocabularies used when mapping XML instances.
use crate::error::invalid;
use crate::error::Xml2OwlError;

use std::borrow::Borrow;
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

macro_rules! vocabulary_traits {
    ($($enum_type:ident),+) => {
        $(
            impl std::str::FromStr for $enum_type {
                type Err = Xml2OwlError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    $enum_type::all()
                        .into_iter()
                        .find(|variant| variant.iri_s() == s)
                        .ok_or_else(|| invalid!("Unknown {} variant: {:?}", stringify!{$enum_type}, s))
                }
            }

            impl TryFrom<&str> for $enum_type {
                type Error = Xml2OwlError;

                fn try_from(value: &str) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }

            impl AsRef<str> for $enum_type {
                fn as_ref(&self) -> &str {
                    self.iri_s()
                }
            }

            impl Borrow<str> for $enum_type {
                fn borrow(&self) -> &str {
                    self.iri_s()
                }
            }

            impl Display for $enum_type {
                fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.iri_s())
                }
            }
        )+
    };
}

macro_rules! vocabulary_type {
    ($(#[$attr:meta])* $enum_type:ident, $ns:literal, [$(($variant:ident, $local:literal)),*]) => {

        $(#[$attr]) *
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub enum $enum_type {
            $(
                $variant,
            )*
        }

        impl $enum_type {
            pub fn iri_s(&self) -> &'static str {
                match self {
                    $(
                        $enum_type::$variant => concat!($ns, $local),
                    )*
                }
            }

            pub fn all() -> Vec<Self> {
                vec![$($enum_type::$variant),*]
            }
        }

        vocabulary_traits! { $enum_type }
    }
}

vocabulary_type! {
    /// Namespaces that are used when reading and writing instances.
    Namespace, "", [
        (OWL, "http://www.w3.org/2002/07/owl#"),
        (RDF, "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
        (RDFS, "http://www.w3.org/2000/01/rdf-schema#"),
        (XML, "http://www.w3.org/XML/1998/namespace"),
        (XMLNS, "http://www.w3.org/2000/xmlns/"),
        (XSD, "http://www.w3.org/2001/XMLSchema#"),
        (XSI, "http://www.w3.org/2001/XMLSchema-instance")
    ]
}

vocabulary_type! {
    /// RDF vocabulary.
    RDF, "http://www.w3.org/1999/02/22-rdf-syntax-ns#", [
        (Description, "Description"),
        (First, "first"),
        (Nil, "nil"),
        (Rest, "rest"),
        (Type, "type")
    ]
}

vocabulary_type! {
    RDFS, "http://www.w3.org/2000/01/rdf-schema#", [
        (Datatype, "Datatype"),
        (SubClassOf, "subClassOf")
    ]
}

vocabulary_type! {
    OWL, "http://www.w3.org/2002/07/owl#", [
        (AllValuesFrom, "allValuesFrom"),
        (Class, "Class"),
        (DatatypeProperty, "DatatypeProperty"),
        (ObjectProperty, "ObjectProperty"),
        (OneOf, "oneOf"),
        (OnProperty, "onProperty"),
        (Ontology, "Ontology"),
        (Restriction, "Restriction"),
        (SomeValuesFrom, "someValuesFrom")
    ]
}

vocabulary_type! {
    /// The XSD datatypes the mapper treats specially.
    XSD, "http://www.w3.org/2001/XMLSchema#", [
        (AnyURI, "anyURI"),
        (String, "string")
    ]
}

pub fn is_xsd_datatype<A: AsRef<str>>(iri: A) -> bool {
    // This only checks that the IRI starts with the XSD namespace.
    iri.as_ref().starts_with(Namespace::XSD.iri_s())
}

/// Prefix prepended to the local part of every minted instance name.
pub const INSTANCE_NAME_PREFIX: &str = "INS";

/// Local name of the property carrying text content of mixed classes.
pub const MIXED_CONTENT_PROPERTY: &str = "textContent";

/// Suffix of datatypes derived from named simple types.
pub const DATATYPE_SUFFIX: &str = "Datatype";

/// Default prefix of object and datatype property names.
pub const DEFAULT_PROPERTY_PREFIX: &str = "has";

/// Default base namespace for instance resources.
pub const DEFAULT_BASE: &str = "http://www.example.org/example";

/// Working namespace used when the instance namespace is relative.
pub const NOT_ABSOLUTE_NS: &str = "http://uri-not-absolute.com#";

/// Working namespace used when the instance namespace is not an IRI.
pub const NOT_VALID_NS: &str = "http://uri-not-valid.com#";

/// Prefix bound to the working namespace when nothing better is found.
pub const FALLBACK_PREFIX: &str = "NS";

/// Build the name of a property from a prefix and an element or
/// attribute name.
///
/// The first character of `name` is upper-cased when a prefix is
/// given, so `("has", "name")` gives `hasName`.
///
/// # Examples
/// ```
/// # use xml2owl::vocab::property_name;
/// assert_eq!(property_name("has", "name"), "hasName");
/// assert_eq!(property_name("", "name"), "name");
/// ```
pub fn property_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        return name.to_string();
    }

    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", prefix, first.to_uppercase(), chars.as_str()),
        None => prefix.to_string(),
    }
}

/// Return the local part of an IRI, the text after the last `#` or,
/// failing that, the last `/`. Other IRIs are split before their
/// longest NCName suffix.
pub fn local_name(iri: &str) -> &str {
    match iri.rfind('#').or_else(|| iri.rfind('/')) {
        Some(index) => &iri[index + 1..],
        None => split_iri(iri).map(|(_, local)| local).unwrap_or(iri),
    }
}

/// Split an IRI into a namespace and the longest local part which is
/// an NCName.
pub fn split_iri(iri: &str) -> Option<(&str, &str)> {
    let mut start = None;
    for (i, c) in iri.char_indices().rev() {
        if !is_name_char(c) {
            break;
        }
        if is_name_start_char(c) {
            start = Some(i);
        }
    }

    start.map(|i| iri.split_at(i))
}

pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}' |
        '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c, '-' | '.' | '0'..='9' | '\u{B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// True if `s` is a non-colonised XML name, and so usable as a prefix
/// or the local part of a QName.
pub fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_name_start_char(c) => chars.all(is_name_char),
        _ => false,
    }
}
