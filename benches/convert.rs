use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use xml2owl::io::rdf::reader::{read, OntologyConfiguration};
use xml2owl::io::RdfFormat;
use xml2owl::{convert, MapperConfiguration};

/// An instance document with `n` addresses.
fn document(n: usize) -> String {
    let mut s = String::from(r#"<Person xmlns="http://www.example.com/person"><name>Alice</name>"#);
    for i in 0..n {
        s.push_str(&format!(
            "<address><city>City {}</city><postcode>{:05}</postcode></address>",
            i, i
        ));
    }
    s.push_str("</Person>");
    s
}

fn convert_document(c: &mut Criterion) {
    let ont = read(
        include_str!("../src/ont/person.owl").as_bytes(),
        OntologyConfiguration::default(),
    )
    .unwrap();

    let mut group = c.benchmark_group("convert");
    for n in [10, 100, 1_000, 10_000].iter() {
        let doc = xml2owl::io::xml::read(document(*n).as_bytes()).unwrap();
        group.throughput(Throughput::Elements(*n as u64));

        group.bench_with_input(BenchmarkId::new("convert", n), &doc, |b, doc| {
            b.iter(|| convert(doc, &ont, MapperConfiguration::default()).unwrap())
        });
    }
}

fn write_graph(c: &mut Criterion) {
    let ont = read(
        include_str!("../src/ont/person.owl").as_bytes(),
        OntologyConfiguration::default(),
    )
    .unwrap();
    let doc = xml2owl::io::xml::read(document(1_000).as_bytes()).unwrap();
    let graph = convert(&doc, &ont, MapperConfiguration::default()).unwrap();

    let mut group = c.benchmark_group("write");
    for format in RdfFormat::all() {
        let id = format.name().replace('/', "-");
        group.bench_with_input(BenchmarkId::new("write", id), &format, |b, &format| {
            b.iter(|| {
                let mut out = vec![];
                graph.write(&mut out, format).unwrap();
                out
            })
        });
    }
}

criterion_group!(benches, convert_document, write_graph);
criterion_main!(benches);
