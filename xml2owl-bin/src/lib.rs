//! Support for xml2owl command line programmes

use xml2owl::{
    error::Xml2OwlError,
    io::{rdf::reader::OntologyConfiguration, xml::Document},
    ontology::schema::SchemaOntology,
};

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Read an RDF/XML ontology from `path`.
pub fn parse_ontology(
    path: &Path,
    config: OntologyConfiguration,
) -> Result<SchemaOntology, Xml2OwlError> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("owl") | Some("rdf") | Some("xml") => {
            let file = File::open(path)?;
            let mut bufreader = BufReader::new(file);
            xml2owl::io::rdf::reader::read(&mut bufreader, config)
        }
        _ => Err(Xml2OwlError::CommandError(format!(
            "Cannot read an ontology from a file of this format: {:?}",
            path
        ))),
    }
}

/// Read an XML instance document from `path`.
pub fn parse_document(path: &Path) -> Result<Document, Xml2OwlError> {
    let file = File::open(path)?;
    xml2owl::io::xml::read(BufReader::new(file))
}

/// The file at `path`, or standard out.
pub fn output(path: Option<&str>) -> Result<Box<dyn Write>, Xml2OwlError> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(std::io::stdout()),
    })
}

/// Send log records to standard error, filtered by `RUST_LOG` and
/// showing warnings otherwise.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Fails only if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub mod config {
    use clap::App;
    use clap::Arg;
    use clap::ArgMatches;

    use xml2owl::error::Xml2OwlError;
    use xml2owl::io::rdf::reader::OntologyConfiguration;
    use xml2owl::io::RdfFormat;
    use xml2owl::{MapperConfiguration, NamespaceBinding};

    pub fn ontology_app(app: App<'static>) -> App<'static> {
        app.arg(
            Arg::with_name("op-prefix")
                .long("op-prefix")
                .takes_value(true)
                .help("Prefix of object property names (default: has)"),
        )
        .arg(
            Arg::with_name("dtp-prefix")
                .long("dtp-prefix")
                .takes_value(true)
                .help("Prefix of datatype property names (default: has)"),
        )
    }

    pub fn ontology_config(matches: &ArgMatches) -> OntologyConfiguration {
        let default = OntologyConfiguration::default();
        OntologyConfiguration {
            object_property_prefix: matches
                .value_of("op-prefix")
                .map(str::to_string)
                .unwrap_or(default.object_property_prefix),
            datatype_property_prefix: matches
                .value_of("dtp-prefix")
                .map(str::to_string)
                .unwrap_or(default.datatype_property_prefix),
        }
    }

    pub fn mapper_app(app: App<'static>) -> App<'static> {
        app.arg(
            Arg::with_name("base")
                .long("base")
                .short('b')
                .takes_value(true)
                .help("Base namespace of instance resources"),
        )
        .arg(
            Arg::with_name("namespace")
                .long("namespace")
                .takes_value(true)
                .requires("prefix")
                .help("Namespace of the document's elements, instead of the root's"),
        )
        .arg(
            Arg::with_name("prefix")
                .long("prefix")
                .takes_value(true)
                .requires("namespace")
                .help("Prefix for the document namespace"),
        )
        .arg(
            Arg::with_name("nonce")
                .long("nonce")
                .takes_value(true)
                .help("Fix the number distinguishing the resources of this run"),
        )
    }

    pub fn mapper_config(matches: &ArgMatches) -> Result<MapperConfiguration, Xml2OwlError> {
        let mut config = MapperConfiguration::default();

        if let Some(base) = matches.value_of("base") {
            config.base = base.trim_end_matches('#').to_string();
        }

        if let (Some(ns), Some(prefix)) = (matches.value_of("namespace"), matches.value_of("prefix")) {
            config.namespace = Some(NamespaceBinding {
                namespace: if ns.ends_with('#') {
                    ns.to_string()
                } else {
                    format!("{}#", ns)
                },
                prefix: prefix.to_string(),
            });
        }

        if let Some(nonce) = matches.value_of("nonce") {
            config.nonce = Some(nonce.parse().map_err(|_| {
                Xml2OwlError::CommandError(format!("Nonce must be a number: {}", nonce))
            })?);
        }

        Ok(config)
    }

    pub fn format_app(app: App<'static>) -> App<'static> {
        app.arg(
            Arg::with_name("format")
                .long("format")
                .short('f')
                .takes_value(true)
                .help("One of RDF/XML, RDF/XML-ABBREV, N-TRIPLE or N3 (default: RDF/XML)"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short('o')
                .takes_value(true)
                .help("Write to this file rather than standard out"),
        )
    }

    pub fn format(matches: &ArgMatches) -> Result<RdfFormat, Xml2OwlError> {
        match matches.value_of("format") {
            Some(f) => f
                .parse()
                .map_err(|_| Xml2OwlError::CommandError(format!("Unknown format: {}", f))),
            None => Ok(RdfFormat::default()),
        }
    }
}
