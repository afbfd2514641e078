//! Integration tests for the marc2eprints library

mod common;

use std::fs;
use std::process::Command;

use common::{
    collection, config_for, create_simple_record, eprint_blocks, fixture, ARTICLE_SAMPLE,
    THESIS_SAMPLE,
};
use marc2eprints::{
    convert_file, convert_str, default_output_path, eprints_xml_from_str, read_marcxml_file,
    AbstractJoin, ConversionConfig, ConvertError, DocumentProfile, DocumentType, KeywordShape,
    RecordAssembler,
};

#[test]
fn test_simple_record_end_to_end() {
    let config = ConversionConfig::default();
    let eprint = RecordAssembler::new(&config)
        .expect("Default config is valid")
        .assemble(&create_simple_record())
        .eprint;

    assert_eq!(eprint.title.as_deref(), Some("Title One"));
    assert_eq!(eprint.creators.len(), 1);
    assert_eq!(eprint.creators[0].family, "Smith");
    assert_eq!(eprint.creators[0].given, "John");
    assert!(eprint.contributors.is_empty());
    assert_eq!(eprint.abstract_text.as_deref(), Some("Summary text"));
    assert_eq!(eprint.doc_type, DocumentType::Article);
    assert_eq!(eprint.thesis_type, None);
}

#[test]
fn test_convert_thesis_file() {
    let dir = tempfile::tempdir().expect("Could not create temp dir");
    let output = dir.path().join("out.xml");

    let report = convert_file(
        &fixture(THESIS_SAMPLE),
        &output,
        &config_for(DocumentProfile::Thesis),
    )
    .expect("Conversion failed");
    assert_eq!(report.records, 3);
    assert_eq!(report.recovered, 0);

    let xml = fs::read_to_string(&output).expect("Could not read output");
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<eprints>\n"));
    assert!(xml.ends_with("</eprints>\n"));

    let blocks = eprint_blocks(&xml);
    assert_eq!(blocks.len(), 3);

    // Fully populated doctoral thesis
    let first = blocks[0];
    let expected_order = [
        "<title>Mercados financieros un análisis empírico</title>",
        "<family>Garcia</family>",
        "<given>Juan Carlos</given>",
        "<contributors>",
        "<family>Lopez</family>",
        "<type>http://www.loc.gov/loc.terms/relators/CTB</type>",
        "<date>2019</date>",
        "<date_type>published</date_type>",
        "<official_url>https://repositorio.example.edu/tesis/0001</official_url>",
        "<department>Facultad de Ciencias Económicas</department>",
        "<institution>Universidad Nacional</institution>",
        "<note>Incluye anexos</note>",
        "<keywords>finanzas, econometría</keywords>",
        "<abstract>Primer párrafo, Segundo párrafo</abstract>",
        "<type>thesis</type>",
        "<thesis_type>doctoral</thesis_type>",
    ];
    let mut position = 0;
    for element in expected_order {
        let found = first[position..]
            .find(element)
            .unwrap_or_else(|| panic!("{element} missing or out of order"));
        position += found + element.len();
    }

    // Escaped title, blank abstract suppressed, thesis type kept verbatim
    let second = blocks[1];
    assert!(second.contains("<title>Costos &amp; beneficios</title>"));
    assert!(!second.contains("<abstract>"));
    assert!(second.contains("<thesis_type>Tesis Maestría</thesis_type>"));

    // No thesis marker: article
    let third = blocks[2];
    assert!(third.contains("<title>Registro sin autor</title>"));
    assert!(third.contains("<type>article</type>"));
    assert!(!third.contains("<thesis_type>"));
    assert!(!third.contains("<creators>"));
}

#[test]
fn test_convert_article_file_recovers_malformed_786() {
    let dir = tempfile::tempdir().expect("Could not create temp dir");
    let output = dir.path().join("articles.xml");

    let report = convert_file(
        &fixture(ARTICLE_SAMPLE),
        &output,
        &config_for(DocumentProfile::Article),
    )
    .expect("Conversion failed");
    assert_eq!(report.records, 2);
    assert_eq!(report.recovered, 1);

    let xml = fs::read_to_string(&output).expect("Could not read output");
    let blocks = eprint_blocks(&xml);
    assert_eq!(blocks.len(), 2);

    let first = blocks[0];
    assert!(first.contains("<publisher>Editorial Universitaria, Buenos Aires</publisher>"));
    assert!(first.contains("<publication>Revista de Economía</publication>"));
    assert!(first.contains("<number>Vol. 12</number>"));
    assert!(first.contains("<date>2018</date>"));
    assert!(first.contains("<date_type>published</date_type>"));
    assert!(first.contains("<type>article</type>"));

    let second = blocks[1];
    assert!(second.contains("<title>Broken series statement</title>"));
    assert!(!second.contains("<publication>"));
    assert!(!second.contains("<number>"));
    assert!(second.contains("<publisher>Prensa Académica</publisher>"));
    assert!(second.contains("<date>2020</date>"));
}

#[test]
fn test_conversion_is_deterministic() {
    let dir = tempfile::tempdir().expect("Could not create temp dir");
    let first = dir.path().join("first.xml");
    let second = dir.path().join("second.xml");
    let config = ConversionConfig::default();

    convert_file(&fixture(THESIS_SAMPLE), &first, &config).expect("First run failed");
    convert_file(&fixture(THESIS_SAMPLE), &second, &config).expect("Second run failed");

    assert_eq!(
        fs::read(&first).expect("Could not read first output"),
        fs::read(&second).expect("Could not read second output")
    );
}

#[test]
fn test_parallel_output_matches_sequential() {
    let bodies: Vec<String> = (0..64)
        .map(|i| {
            format!(
                r#"<datafield tag="245" ind1="1" ind2="0"><subfield code="a">Record {i}</subfield></datafield>"#
            )
        })
        .collect();
    let refs: Vec<&str> = bodies.iter().map(String::as_str).collect();
    let xml = collection(&refs);

    let sequential = ConversionConfig::default();
    let parallel = ConversionConfig {
        parallel: true,
        ..ConversionConfig::default()
    };

    let (seq_out, seq_report) = convert_str(&xml, &sequential).expect("Sequential failed");
    let (par_out, par_report) = convert_str(&xml, &parallel).expect("Parallel failed");
    assert_eq!(seq_out, par_out);
    assert_eq!(seq_report, par_report);
    assert_eq!(seq_report.records, 64);

    let blocks = eprint_blocks(&par_out);
    assert_eq!(blocks.len(), 64);
    assert!(blocks[10].contains("<title>Record 10</title>"));
}

#[test]
fn test_missing_input_writes_nothing() {
    let dir = tempfile::tempdir().expect("Could not create temp dir");
    let input = dir.path().join("missing.xml");
    let output = dir.path().join("out.xml");

    let err = convert_file(&input, &output, &ConversionConfig::default())
        .expect_err("Missing input should fail");
    assert!(matches!(err, ConvertError::InputLoad { .. }));
    assert!(err.is_fatal());
    assert!(!output.exists());
}

#[test]
fn test_malformed_input_writes_nothing() {
    let dir = tempfile::tempdir().expect("Could not create temp dir");
    let input = dir.path().join("broken.xml");
    let output = dir.path().join("out.xml");
    fs::write(&input, "<collection><record><datafield tag=\"245\">").expect("Write failed");

    let err = convert_file(&input, &output, &ConversionConfig::default())
        .expect_err("Malformed input should fail");
    match err {
        ConvertError::InputLoad { path, .. } => assert_eq!(path, input),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn test_blank_default_thesis_type_rejected_before_writing() {
    let dir = tempfile::tempdir().expect("Could not create temp dir");
    let output = dir.path().join("out.xml");
    let config = ConversionConfig {
        default_thesis_type: String::new(),
        ..config_for(DocumentProfile::Thesis)
    };

    let err = convert_file(&fixture(THESIS_SAMPLE), &output, &config)
        .expect_err("Blank default thesis type should fail");
    assert!(matches!(err, ConvertError::Config(_)));
    assert!(!output.exists());

    let xml = collection(&[r#"<datafield tag="502"><subfield code="c">Facultad</subfield></datafield>"#]);
    assert!(matches!(
        eprints_xml_from_str(&xml, &config),
        Err(ConvertError::Config(_))
    ));
}

#[test]
fn test_unwritable_output() {
    let dir = tempfile::tempdir().expect("Could not create temp dir");
    let output = dir.path().join("no-such-dir").join("out.xml");

    let err = convert_file(&fixture(THESIS_SAMPLE), &output, &ConversionConfig::default())
        .expect_err("Unwritable output should fail");
    assert!(matches!(err, ConvertError::OutputSave { .. }));
}

#[test]
fn test_configuration_options_flow_through() {
    let xml = collection(&[concat!(
        r#"<datafield tag="520"><subfield code="a">First.</subfield></datafield>"#,
        r#"<datafield tag="520"><subfield code="a">Second</subfield></datafield>"#,
        r#"<datafield tag="653"><subfield code="a">uno</subfield></datafield>"#,
        r#"<datafield tag="787"><subfield code="u">https://example.org/a</subfield></datafield>"#,
        r#"<datafield tag="502"><subfield code="a">Tesis</subfield></datafield>"#,
    )]);
    let config = ConversionConfig::from_json_str(
        r#"{"abstract_join": "sentence", "keyword_shape": "subject_items", "url_subfield": "u"}"#,
    )
    .expect("Invalid config");
    assert_eq!(config.abstract_join, AbstractJoin::Sentence);
    assert_eq!(config.keyword_shape, KeywordShape::SubjectItems);

    let out = eprints_xml_from_str(&xml, &config).expect("Conversion failed");
    assert!(out.contains("<abstract>First. Second.</abstract>"));
    assert!(out.contains("<subjects>\n      <item>uno</item>\n    </subjects>"));
    assert!(!out.contains("<keywords>"));
    assert!(out.contains("<official_url>https://example.org/a</official_url>"));
    assert!(out.contains("<thesis_type>Tesis</thesis_type>"));
}

#[test]
fn test_read_fixture_records() {
    let records = read_marcxml_file(&fixture(THESIS_SAMPLE)).expect("Could not load fixture");
    assert_eq!(records.len(), 3);
    let tags: Vec<&str> = records[0].fields().map(|f| f.tag.as_str()).collect();
    assert_eq!(
        tags,
        vec!["100", "245", "260", "500", "520", "520", "653", "690", "700", "787"]
    );
}

#[test]
fn test_cli_writes_default_output() {
    let dir = tempfile::tempdir().expect("Could not create temp dir");
    let input = dir.path().join("tesis.xml");
    fs::copy(fixture(THESIS_SAMPLE), &input).expect("Copy failed");

    let status = Command::new(env!("CARGO_BIN_EXE_marc2eprints"))
        .arg(&input)
        .arg("--profile")
        .arg("thesis")
        .status()
        .expect("Could not run binary");
    assert!(status.success());

    let output = default_output_path(&input);
    assert_eq!(output, dir.path().join("tesis_eprints.xml"));
    let xml = fs::read_to_string(&output).expect("Output not written");
    assert_eq!(eprint_blocks(&xml).len(), 3);
}

#[test]
fn test_cli_fails_on_missing_input() {
    let dir = tempfile::tempdir().expect("Could not create temp dir");
    let input = dir.path().join("missing.xml");

    let status = Command::new(env!("CARGO_BIN_EXE_marc2eprints"))
        .arg(&input)
        .status()
        .expect("Could not run binary");
    assert_eq!(status.code(), Some(1));
    assert!(!dir.path().join("missing_eprints.xml").exists());
}
