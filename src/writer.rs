//! Writing EPrints import XML.
//!
//! This module provides [`EprintsWriter`] for serializing [`EprintRecord`]
//! instances to a pretty-printed, UTF-8 `<eprints>` document on any
//! destination implementing [`std::io::Write`].
//!
//! Element text is escaped here, and only here, with
//! [`escape_text`](crate::normalize::escape_text).
//!
//! # Examples
//!
//! ```
//! use marc2eprints::{ConversionConfig, RecordAssembler, SourceField, SourceRecord};
//! use marc2eprints::writer::EprintsWriter;
//!
//! let record = SourceRecord::builder()
//!     .field(SourceField::builder("245").subfield('a', "Fish & Chips").build())
//!     .build();
//! let config = ConversionConfig::default();
//! let eprint = RecordAssembler::new(&config)?.assemble(&record).eprint;
//!
//! let mut buffer = Vec::new();
//! let mut writer = EprintsWriter::new(&mut buffer);
//! writer.write_record(&eprint)?;
//! writer.finish()?;
//!
//! let xml = String::from_utf8(buffer).unwrap();
//! assert!(xml.contains("<title>Fish &amp; Chips</title>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::eprint::{EprintRecord, Person};
use crate::normalize::escape_text;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const INDENT: &str = "  ";

/// Writer for EPrints import XML.
///
/// The `<eprints>` root is opened by the first write (or by
/// [`finish`](Self::finish) when no record was written), and closed by
/// [`finish`](Self::finish), which must be called.
#[derive(Debug)]
pub struct EprintsWriter<W: Write> {
    writer: W,
    started: bool,
    records_written: usize,
}

impl<W: Write> EprintsWriter<W> {
    /// Create a new writer
    pub fn new(writer: W) -> Self {
        EprintsWriter {
            writer,
            started: false,
            records_written: 0,
        }
    }

    /// Write one `<eprint>` element.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the destination fails.
    pub fn write_record(&mut self, record: &EprintRecord) -> io::Result<()> {
        self.start()?;
        self.writer.write_all(eprint_to_xml(record).as_bytes())?;
        self.records_written += 1;
        Ok(())
    }

    /// Number of records written so far
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Close the document and flush the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing fails.
    pub fn finish(mut self) -> io::Result<W> {
        self.start()?;
        self.writer.write_all(b"</eprints>\n")?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn start(&mut self) -> io::Result<()> {
        if !self.started {
            self.writer.write_all(XML_DECLARATION.as_bytes())?;
            self.writer.write_all(b"<eprints>\n")?;
            self.started = true;
        }
        Ok(())
    }
}

/// Serialize a whole document to a string.
#[must_use]
pub fn eprints_to_xml(records: &[EprintRecord]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str("<eprints>\n");
    for record in records {
        xml.push_str(&eprint_to_xml(record));
    }
    xml.push_str("</eprints>\n");
    xml
}

/// Serialize one `<eprint>` element, indented for its place under `<eprints>`.
#[must_use]
pub fn eprint_to_xml(record: &EprintRecord) -> String {
    let mut xml = String::new();
    let depth = 1;
    open(&mut xml, depth, "eprint");

    write_element(&mut xml, depth + 1, "title", record.title.as_deref());
    write_people(&mut xml, depth + 1, "creators", &record.creators);
    write_people(&mut xml, depth + 1, "contributors", &record.contributors);
    write_element(&mut xml, depth + 1, "publisher", record.publisher.as_deref());
    write_element(&mut xml, depth + 1, "publication", record.publication.as_deref());
    write_element(&mut xml, depth + 1, "number", record.number.as_deref());
    write_element(&mut xml, depth + 1, "date", record.date.as_deref());
    write_element(&mut xml, depth + 1, "date_type", record.date_type.as_deref());
    write_element(&mut xml, depth + 1, "official_url", record.official_url.as_deref());
    write_element(&mut xml, depth + 1, "department", record.department.as_deref());
    write_element(&mut xml, depth + 1, "institution", record.institution.as_deref());
    write_element(&mut xml, depth + 1, "note", record.note.as_deref());
    write_element(&mut xml, depth + 1, "keywords", record.keywords.as_deref());
    write_element(&mut xml, depth + 1, "abstract", record.abstract_text.as_deref());
    write_subjects(&mut xml, depth + 1, &record.subjects);
    write_element(&mut xml, depth + 1, "type", Some(record.doc_type.as_str()));
    write_element(&mut xml, depth + 1, "thesis_type", record.thesis_type.as_deref());

    close(&mut xml, depth, "eprint");
    xml
}

fn indent(xml: &mut String, depth: usize) {
    for _ in 0..depth {
        xml.push_str(INDENT);
    }
}

fn open(xml: &mut String, depth: usize, tag: &str) {
    indent(xml, depth);
    writeln!(xml, "<{tag}>").ok();
}

fn close(xml: &mut String, depth: usize, tag: &str) {
    indent(xml, depth);
    writeln!(xml, "</{tag}>").ok();
}

/// Write `<tag>value</tag>`; blank or missing values write nothing.
fn write_element(xml: &mut String, depth: usize, tag: &str, value: Option<&str>) {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    indent(xml, depth);
    writeln!(xml, "<{tag}>{}</{tag}>", escape_text(value)).ok();
}

fn write_people(xml: &mut String, depth: usize, tag: &str, people: &[Person]) {
    if people.is_empty() {
        return;
    }
    open(xml, depth, tag);
    for person in people {
        open(xml, depth + 1, "item");
        open(xml, depth + 2, "name");
        write_element(xml, depth + 3, "family", Some(&person.family));
        write_element(xml, depth + 3, "given", Some(&person.given));
        close(xml, depth + 2, "name");
        write_element(xml, depth + 2, "type", person.relator_uri.as_deref());
        close(xml, depth + 1, "item");
    }
    close(xml, depth, tag);
}

fn write_subjects(xml: &mut String, depth: usize, subjects: &[String]) {
    if subjects.iter().all(|s| s.trim().is_empty()) {
        return;
    }
    open(xml, depth, "subjects");
    for subject in subjects {
        write_element(xml, depth + 1, "item", Some(subject));
    }
    close(xml, depth, "subjects");
}
