//! Errors for the xml2owl library
use std::fmt::{Display, Formatter};

use thiserror::Error;

#[derive(Debug)]
pub enum Location {
    BytePosition(usize),
    Unknown,
}

impl From<usize> for Location {
    fn from(u: usize) -> Self {
        Location::BytePosition(u)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BytePosition(u) => write!(f, "Byte Position: {u}"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Error for the xml2owl library
#[derive(Debug, Error)]
pub enum Xml2OwlError {
    /// An IO Error
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    /// An error found during the parsing of an underlying format
    #[error("Parsing Error: {0}")]
    ParserError(Box<dyn std::error::Error>, Location),

    /// Data has been given that we cannot make sense of
    #[error("Validity Error: {0} at {1}")]
    ValidityError(String, Location),

    /// The instance document cannot be mapped onto the ontology
    #[error("Mapping Error: {0}")]
    MappingError(String),

    /// A failure below a node of the instance document.
    ///
    /// Nested traversal errors spell out the path from the root to the
    /// node where the failure happened.
    #[error("Failed to traverse {node}: {source}")]
    TraversalError {
        node: String,
        #[source]
        source: Box<Xml2OwlError>,
    },

    /// A command has been given that is invalid
    #[error("Command Error: {0}")]
    CommandError(String),
}

macro_rules! invalid {
    ($($arg:tt)*) => {
        Xml2OwlError::ValidityError(format!($($arg)*), crate::error::Location::Unknown)
    }
}

pub(crate) use invalid;

impl Xml2OwlError {
    pub fn invalid_at<S: Into<String>, L: Into<Location>>(s: S, l: L) -> Xml2OwlError {
        Xml2OwlError::ValidityError(s.into(), l.into())
    }

    pub fn invalid<S: Into<String>>(s: S) -> Xml2OwlError {
        Xml2OwlError::ValidityError(s.into(), Location::Unknown)
    }

    pub fn mapping<S: Into<String>>(s: S) -> Xml2OwlError {
        Xml2OwlError::MappingError(s.into())
    }

    /// Wrap this error with the identity of the node being traversed.
    pub fn within<S: Into<String>>(self, node: S) -> Xml2OwlError {
        Xml2OwlError::TraversalError {
            node: node.into(),
            source: Box::new(self),
        }
    }

    /// The path of nodes leading to the failure, outermost first.
    pub fn node_path(&self) -> Vec<&str> {
        let mut path = vec![];
        let mut current = self;
        while let Xml2OwlError::TraversalError { node, source } = current {
            path.push(&node[..]);
            current = source;
        }
        path
    }
}

impl From<oxiri::IriParseError> for Xml2OwlError {
    fn from(e: oxiri::IriParseError) -> Self {
        Self::ParserError(e.into(), Location::Unknown)
    }
}

impl From<rio_xml::RdfXmlError> for Xml2OwlError {
    fn from(e: rio_xml::RdfXmlError) -> Self {
        Self::ParserError(e.into(), Location::Unknown)
    }
}

impl From<quick_xml::Error> for Xml2OwlError {
    fn from(e: quick_xml::Error) -> Self {
        Self::ParserError(e.into(), Location::Unknown)
    }
}

impl From<quick_xml::escape::EscapeError> for Xml2OwlError {
    fn from(e: quick_xml::escape::EscapeError) -> Self {
        Self::ParserError(e.into(), Location::Unknown)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn node_path_is_outermost_first() {
        let e = Xml2OwlError::mapping("boom")
            .within("<city>")
            .within("<address>");

        assert_eq!(e.node_path(), vec!["<address>", "<city>"]);
        assert_eq!(
            e.to_string(),
            "Failed to traverse <address>: Failed to traverse <city>: Mapping Error: boom"
        );
    }
}
