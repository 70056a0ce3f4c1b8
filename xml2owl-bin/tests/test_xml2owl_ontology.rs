use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::process::Command; // Run programs

#[test]
fn integration_ontology_rdfxml() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("xml2owl-ontology")?;

    cmd.arg("../src/ont/person.owl");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("owl:Restriction"));

    Ok(())
}

#[test]
fn integration_ontology_turtle() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("xml2owl")?;

    cmd.args(["ontology", "../src/ont/person.owl", "--format", "N3"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "<http://www.example.com/person#Person>",
        ));

    Ok(())
}

#[test]
fn integration_ontology_wrong_extension() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("xml2owl-ontology")?;

    cmd.arg("../src/ont/person.ofn");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read an ontology"));

    Ok(())
}
