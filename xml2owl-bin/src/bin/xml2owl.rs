use clap::App;
use clap::ArgMatches;

use xml2owl::error::Xml2OwlError;
use xml2owl_bin::init_logging;

mod xml2owl_convert;
mod xml2owl_ontology;

fn main() -> Result<(), Xml2OwlError> {
    init_logging();
    let matches = app().get_matches();
    matcher(matches)
}

fn app() -> App<'static> {
    App::new("xml2owl")
        .version("0.1")
        .about("Map XML instance documents to RDF using OWL ontologies")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(xml2owl_convert::app("convert"))
        .subcommand(xml2owl_ontology::app("ontology"))
}

fn matcher(matches: ArgMatches) -> Result<(), Xml2OwlError> {
    match matches.subcommand() {
        Some(("convert", submatches)) => xml2owl_convert::matcher(submatches),
        Some(("ontology", submatches)) => xml2owl_ontology::matcher(submatches),
        Some((name, _)) => Err(Xml2OwlError::CommandError(format!(
            "Unknown command: {}",
            name
        ))),
        None => Ok(()),
    }
}
