extern crate clap;
extern crate xml2owl;

use clap::App;
use clap::Arg;
use clap::ArgMatches;

use log::info;

use xml2owl_bin::{
    config::{format, format_app, mapper_app, mapper_config, ontology_app, ontology_config},
    init_logging, output, parse_document, parse_ontology,
};

use xml2owl::{error::Xml2OwlError, XmlMapper};

use std::io::Write;
use std::path::Path;

#[allow(dead_code)]
fn main() -> Result<(), Xml2OwlError> {
    init_logging();
    let matches = app("xml2owl-convert").get_matches();
    matcher(&matches)
}

pub(crate) fn app(name: &str) -> App<'static> {
    format_app(mapper_app(ontology_app(
        App::new(name)
            .version("0.1")
            .about("Map an XML instance document to RDF using an OWL ontology")
            .arg(
                Arg::with_name("INPUT")
                    .help("Sets the XML document to use")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::with_name("ontology")
                    .long("ontology")
                    .short('t')
                    .takes_value(true)
                    .required(true)
                    .help("The RDF/XML ontology describing the document"),
            ),
    )))
}

pub(crate) fn matcher(matches: &ArgMatches) -> Result<(), Xml2OwlError> {
    let input = matches
        .value_of("INPUT")
        .ok_or_else(|| Xml2OwlError::CommandError("A file name must be specified".to_string()))?;
    let ontology = matches.value_of("ontology").ok_or_else(|| {
        Xml2OwlError::CommandError("An ontology must be specified".to_string())
    })?;

    let format = format(matches)?;
    let ont = parse_ontology(Path::new(ontology), ontology_config(matches))?;
    let doc = parse_document(Path::new(input))?;

    let mapper = XmlMapper::new(&doc, &ont, mapper_config(matches)?);
    info!("Converting {} with nonce {}", input, mapper.nonce());
    let graph = mapper.convert()?;

    let mut out = output(matches.value_of("output"))?;
    graph.write(&mut out, format)?;
    out.flush()?;

    Ok(())
}
