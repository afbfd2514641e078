//! Common test helpers and utilities shared across test suite.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use marc2eprints::{ConversionConfig, DocumentProfile, SourceField, SourceRecord};

/// Thesis fixture: three records, the first fully populated.
pub const THESIS_SAMPLE: &str = "tests/data/thesis_sample.xml";

/// Article fixture: two records, the second with a malformed 786.
pub const ARTICLE_SAMPLE: &str = "tests/data/article_sample.xml";

/// Path of a fixture relative to the package root.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(name)
}

/// Default configuration for a profile.
pub fn config_for(profile: DocumentProfile) -> ConversionConfig {
    ConversionConfig::for_profile(profile)
}

/// Builds a field from `(code, value)` pairs.
pub fn make_field(tag: &str, subfields: &[(char, &str)]) -> SourceField {
    let mut field = SourceField::new(tag);
    for (code, value) in subfields {
        field.add_subfield(*code, *value);
    }
    field
}

/// Builds the record of the title/author/abstract scenario.
pub fn create_simple_record() -> SourceRecord {
    SourceRecord::builder()
        .field(make_field("245", &[('a', "Title One")]))
        .field(make_field("100", &[('a', "Smith, John"), ('e', "author")]))
        .field(make_field("520", &[('a', "Summary text")]))
        .build()
}

/// Wraps record bodies in a namespaced MARCXML collection.
pub fn collection(records: &[&str]) -> String {
    let mut xml = String::from("<collection xmlns=\"http://www.loc.gov/MARC21/slim\">\n");
    for body in records {
        xml.push_str("<record>");
        xml.push_str(body);
        xml.push_str("</record>\n");
    }
    xml.push_str("</collection>\n");
    xml
}

/// Text of every `<eprint>` element, in document order.
pub fn eprint_blocks(xml: &str) -> Vec<&str> {
    xml.split("<eprint>").skip(1).collect()
}
