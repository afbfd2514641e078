//! Source record structures extracted from MARCXML.
//!
//! This module provides the input side of the conversion:
//! - [`SourceRecord`] - one catalog record, fields in document order
//! - [`SourceField`] - one `datafield`, subfields in document order
//! - [`Subfield`] - one coded value
//!
//! Unlike a general purpose MARC record, fields are kept as a flat sequence
//! rather than grouped by tag: mapping rules must see fields exactly in the
//! order they appeared in the source document.
//!
//! # Examples
//!
//! ```
//! use marc2eprints::{SourceField, SourceRecord};
//!
//! let record = SourceRecord::builder()
//!     .field(
//!         SourceField::builder("245")
//!             .subfield('a', "Title One")
//!             .subfield('b', "a subtitle")
//!             .build(),
//!     )
//!     .build();
//!
//! let title = record.fields().next().unwrap();
//! assert_eq!(title.first_subfield('a'), Some("Title One"));
//! ```

use smallvec::SmallVec;

/// One catalog record: its datafields in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRecord {
    fields: Vec<SourceField>,
}

/// A MARC datafield: a tag plus its coded subfields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceField {
    /// Field tag (3 digits; empty when the source omitted the attribute)
    pub tag: String,
    /// Subfields (stored in `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields)
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    /// Subfield value, untrimmed
    pub value: String,
}

impl SourceRecord {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for fluently constructing records
    #[must_use]
    pub fn builder() -> SourceRecordBuilder {
        SourceRecordBuilder {
            record: SourceRecord::new(),
        }
    }

    /// Append a field after all existing ones
    pub fn add_field(&mut self, field: SourceField) {
        self.fields.push(field);
    }

    /// Iterate over all fields in document order
    pub fn fields(&self) -> impl Iterator<Item = &SourceField> {
        self.fields.iter()
    }

    /// Iterate over fields with a given tag, in document order
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a SourceField> {
        self.fields.iter().filter(move |f| f.tag == tag)
    }

    /// Number of fields in the record
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`SourceRecord`]
#[derive(Debug)]
pub struct SourceRecordBuilder {
    record: SourceRecord,
}

impl SourceRecordBuilder {
    /// Append a field
    #[must_use]
    pub fn field(mut self, field: SourceField) -> Self {
        self.record.add_field(field);
        self
    }

    /// Build the record
    #[must_use]
    pub fn build(self) -> SourceRecord {
        self.record
    }
}

impl SourceField {
    /// Create a field with no subfields
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        SourceField {
            tag: tag.into(),
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for fluently constructing fields
    #[must_use]
    pub fn builder(tag: impl Into<String>) -> SourceFieldBuilder {
        SourceFieldBuilder {
            field: SourceField::new(tag),
        }
    }

    /// Append a subfield
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(Subfield {
            code,
            value: value.into(),
        });
    }

    /// Iterate over all values for a code, in document order, untrimmed
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// First value for a code, trimmed of surrounding whitespace.
    ///
    /// Returns `None` when the field has no subfield with that code. A present
    /// but blank subfield yields `Some("")`; use [`SourceField::non_blank`]
    /// when blank values should count as absent.
    #[must_use]
    pub fn first_subfield(&self, code: char) -> Option<&str> {
        self.subfields_by_code(code).next().map(str::trim)
    }

    /// Like [`SourceField::first_subfield`], but blank values count as absent.
    #[must_use]
    pub fn non_blank(&self, code: char) -> Option<&str> {
        self.first_subfield(code).filter(|v| !v.is_empty())
    }
}

/// Builder for [`SourceField`]
#[derive(Debug)]
pub struct SourceFieldBuilder {
    field: SourceField,
}

impl SourceFieldBuilder {
    /// Append a subfield
    #[must_use]
    pub fn subfield(mut self, code: char, value: &str) -> Self {
        self.field.add_subfield(code, value);
        self
    }

    /// Build the field
    #[must_use]
    pub fn build(self) -> SourceField {
        self.field
    }
}
