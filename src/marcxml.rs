//! MARCXML field extraction.
//!
//! This module turns a MARCXML document, as defined by the Library of Congress
//! (<https://www.loc.gov/standards/marcxml/>), into [`SourceRecord`]s.
//!
//! Both default-namespace (`<record xmlns="...">`) and prefix-namespace
//! (`<marc:record xmlns:marc="...">`) forms are accepted, as are documents
//! without any namespace: elements are matched on their local name. Every
//! `record` element at any depth yields one record; `leader` and
//! `controlfield` content is not needed for the EPrints crosswalk and is
//! skipped.
//!
//! Extraction is forgiving about record content and strict about XML syntax:
//! a `datafield` without a `tag` attribute gets an empty tag, a `subfield`
//! without a `code` attribute is dropped, but a document that is not
//! well-formed fails with [`ConvertError::InputLoad`].
//!
//! # Examples
//!
//! ```
//! use marc2eprints::marcxml;
//!
//! let xml = r#"<collection xmlns="http://www.loc.gov/MARC21/slim">
//!   <record>
//!     <datafield tag="245" ind1="1" ind2="0">
//!       <subfield code="a">Title One</subfield>
//!     </datafield>
//!   </record>
//! </collection>"#;
//!
//! let records = marcxml::extract_records(xml)?;
//! assert_eq!(records.len(), 1);
//! # Ok::<(), marc2eprints::ConvertError>(())
//! ```

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

use crate::error::{ConvertError, Result};
use crate::record::{SourceField, SourceRecord};

/// The MARCXML namespace URI.
pub const MARCXML_NS: &str = "http://www.loc.gov/MARC21/slim";

/// Read and extract every record of a MARCXML file.
///
/// # Errors
///
/// Returns [`ConvertError::InputLoad`] if the file cannot be read, is not
/// valid UTF-8, or is not well-formed XML.
pub fn read_marcxml_file(path: &Path) -> Result<Vec<SourceRecord>> {
    let bytes = std::fs::read(path).map_err(|e| ConvertError::InputLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let xml = String::from_utf8(bytes).map_err(|e| ConvertError::InputLoad {
        path: path.to_path_buf(),
        reason: format!("input is not valid UTF-8: {e}"),
    })?;

    extract_records(&xml).map_err(|e| e.with_input_path(path))
}

/// Extract every record of a MARCXML document, in document order.
///
/// # Errors
///
/// Returns [`ConvertError::InputLoad`] if the document is not well-formed
/// XML or has no root element.
pub fn extract_records(xml: &str) -> Result<Vec<SourceRecord>> {
    let xml = xml.trim_start_matches('\u{feff}');
    let mut reader = Reader::from_str(xml);
    let mut state = ExtractState::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                state.check_single_root()?;
                state.depth += 1;
                state.open(&e)?;
            },
            Ok(Event::Empty(e)) => {
                state.check_single_root()?;
                state.depth += 1;
                state.open(&e)?;
                state.close();
                state.depth -= 1;
            },
            Ok(Event::End(_)) => {
                state.close();
                state.depth = state.depth.saturating_sub(1);
            },
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| ConvertError::malformed(format!("bad text content: {e}")))?;
                if state.depth == 0 && !value.trim().is_empty() {
                    return Err(ConvertError::malformed("text outside the root element"));
                }
                if let Some(pending) = state.subfield.as_mut() {
                    pending.value.push_str(&value);
                }
            },
            Ok(Event::CData(_)) if state.depth == 0 => {
                return Err(ConvertError::malformed("CDATA outside the root element"));
            },
            Ok(Event::CData(data)) => {
                if let Some(pending) = state.subfield.as_mut() {
                    let value = std::str::from_utf8(&data)
                        .map_err(|e| ConvertError::malformed(format!("bad CDATA section: {e}")))?;
                    pending.value.push_str(value);
                }
            },
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => {
                return Err(ConvertError::malformed(format!(
                    "XML error at byte {}: {e}",
                    reader.buffer_position()
                )))
            },
        }
    }

    if !state.saw_root {
        return Err(ConvertError::malformed("document has no root element"));
    }
    if state.depth != 0 {
        return Err(ConvertError::malformed(format!(
            "{} element(s) left unclosed at end of document",
            state.depth
        )));
    }

    Ok(state.records)
}

/// Subfield currently being read.
#[derive(Debug)]
struct PendingSubfield {
    code: Option<char>,
    value: String,
    depth: usize,
}

/// Cursor over the record/datafield/subfield nesting.
#[derive(Debug, Default)]
struct ExtractState {
    records: Vec<SourceRecord>,
    depth: usize,
    saw_root: bool,
    record: Option<(SourceRecord, usize)>,
    field: Option<(SourceField, usize)>,
    subfield: Option<PendingSubfield>,
}

impl ExtractState {
    /// A second top-level element means the document has several roots.
    fn check_single_root(&self) -> Result<()> {
        if self.depth == 0 && self.saw_root {
            return Err(ConvertError::malformed(
                "document has more than one root element",
            ));
        }
        Ok(())
    }

    fn open(&mut self, element: &BytesStart<'_>) -> Result<()> {
        self.saw_root = true;

        match element.local_name().as_ref() {
            b"record" if self.record.is_none() => {
                self.record = Some((SourceRecord::new(), self.depth));
            },
            b"datafield" if self.record.is_some() && self.field.is_none() => {
                let tag = attribute(element, b"tag")?.unwrap_or_default();
                self.field = Some((SourceField::new(tag.trim()), self.depth));
            },
            b"subfield" if self.field.is_some() && self.subfield.is_none() => {
                let code = attribute(element, b"code")?.and_then(|c| c.trim().chars().next());
                self.subfield = Some(PendingSubfield {
                    code,
                    value: String::new(),
                    depth: self.depth,
                });
            },
            _ => {},
        }

        Ok(())
    }

    /// Close whichever tracked element was opened at the current depth.
    fn close(&mut self) {
        let depth = self.depth;

        if self.subfield.as_ref().is_some_and(|s| s.depth == depth) {
            if let (Some(pending), Some((field, _))) = (self.subfield.take(), self.field.as_mut()) {
                match pending.code {
                    Some(code) => field.add_subfield(code, pending.value),
                    None => trace!(tag = %field.tag, "dropping subfield without code"),
                }
            }
        } else if self.field.as_ref().is_some_and(|(_, d)| *d == depth) {
            if let (Some((field, _)), Some((record, _))) = (self.field.take(), self.record.as_mut()) {
                record.add_field(field);
            }
        } else if self.record.as_ref().is_some_and(|(_, d)| *d == depth) {
            if let Some((record, _)) = self.record.take() {
                self.records.push(record);
            }
        }
    }
}

/// Read an attribute by local name.
fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ConvertError::malformed(format!("bad attribute: {e}")))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| ConvertError::malformed(format!("bad attribute value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
