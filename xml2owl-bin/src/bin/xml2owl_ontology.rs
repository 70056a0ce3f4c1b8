extern crate clap;
extern crate xml2owl;

use clap::App;
use clap::Arg;
use clap::ArgMatches;

use xml2owl_bin::{
    config::{format, format_app, ontology_app, ontology_config},
    init_logging, output, parse_ontology,
};

use xml2owl::error::Xml2OwlError;

use std::io::Write;
use std::path::Path;

#[allow(dead_code)]
fn main() -> Result<(), Xml2OwlError> {
    init_logging();
    let matches = app("xml2owl-ontology").get_matches();
    matcher(&matches)
}

pub(crate) fn app(name: &str) -> App<'static> {
    format_app(ontology_app(
        App::new(name)
            .version("0.1")
            .about("Read an OWL ontology and write it out again")
            .arg(
                Arg::with_name("INPUT")
                    .help("Sets the input file to use")
                    .required(true)
                    .index(1),
            ),
    ))
}

pub(crate) fn matcher(matches: &ArgMatches) -> Result<(), Xml2OwlError> {
    let input = matches
        .value_of("INPUT")
        .ok_or_else(|| Xml2OwlError::CommandError("A file name must be specified".to_string()))?;

    let format = format(matches)?;
    let ont = parse_ontology(Path::new(input), ontology_config(matches))?;

    let mut out = output(matches.value_of("output"))?;
    xml2owl::io::write_ontology(&mut out, &ont, format)?;
    out.flush()?;

    Ok(())
}
