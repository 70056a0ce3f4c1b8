//! N-Triples and Turtle output, through `rio_turtle`.
use rio_api::formatter::TriplesFormatter;
use rio_turtle::{NTriplesFormatter, TurtleFormatter};

use crate::error::Xml2OwlError;
use crate::model::Triple;

use std::io::Write;

pub fn write_ntriples<'a, W, I>(write: W, triples: I) -> Result<(), Xml2OwlError>
where
    W: Write,
    I: IntoIterator<Item = &'a Triple>,
{
    let mut f = NTriplesFormatter::new(write);
    for t in triples {
        f.format(&t.into())?;
    }
    f.finish()?;
    Ok(())
}

pub fn write_turtle<'a, W, I>(write: W, triples: I) -> Result<(), Xml2OwlError>
where
    W: Write,
    I: IntoIterator<Item = &'a Triple>,
{
    let mut f = TurtleFormatter::new(write);
    for t in triples {
        f.format(&t.into())?;
    }
    f.finish()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::*;
    use crate::vocab::XSD;

    use pretty_assertions::assert_eq;
    use rio_api::parser::TriplesParser;
    use rio_turtle::{NTriplesParser, TurtleError};

    fn triples(b: &Build) -> Vec<Triple> {
        vec![
            Triple::new(
                b.iri("http://www.example.com/s"),
                b.iri("http://www.example.com/p"),
                b.iri("http://www.example.com/o"),
            ),
            Triple::new(
                b.iri("http://www.example.com/s"),
                b.iri("http://www.example.com/q"),
                Literal::Datatype {
                    literal: "say \"hi\"".into(),
                    datatype_iri: b.iri(XSD::String.iri_s()),
                },
            ),
        ]
    }

    #[test]
    fn test_ntriples() {
        let b = Build::new();
        let mut out = vec![];
        write_ntriples(&mut out, &triples(&b)).unwrap();

        let s = String::from_utf8(out).unwrap();
        assert_eq!(s.lines().count(), 2);
        assert!(s.contains("<http://www.example.com/s> <http://www.example.com/p> <http://www.example.com/o> ."));

        let mut count = 0;
        NTriplesParser::new(s.as_bytes())
            .parse_all(&mut |_| -> Result<(), TurtleError> {
                count += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_turtle() {
        let b = Build::new();
        let mut out = vec![];
        write_turtle(&mut out, &triples(&b)).unwrap();

        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("<http://www.example.com/s>"));
        assert!(s.contains("\"say \\\"hi\\\"\""));
    }
}
