#![warn(missing_docs)]

//! # marc2eprints
//!
//! Converts bibliographic records exported as MARCXML (MARC 21 in XML form)
//! into the EPrints repository import XML, one `<eprint>` per `<record>`,
//! in document order.
//!
//! ## Quick Start
//!
//! ```
//! use marc2eprints::{eprints_xml_from_str, ConversionConfig};
//!
//! let marcxml = r#"<collection xmlns="http://www.loc.gov/MARC21/slim">
//!   <record>
//!     <datafield tag="245" ind1="1" ind2="0">
//!       <subfield code="a">Title One</subfield>
//!     </datafield>
//!     <datafield tag="100" ind1="1" ind2=" ">
//!       <subfield code="a">Smith, John</subfield>
//!       <subfield code="e">author</subfield>
//!     </datafield>
//!   </record>
//! </collection>"#;
//!
//! let xml = eprints_xml_from_str(marcxml, &ConversionConfig::default())?;
//! assert!(xml.contains("<title>Title One</title>"));
//! assert!(xml.contains("<family>Smith</family>"));
//! assert!(xml.contains("<type>article</type>"));
//! # Ok::<(), marc2eprints::ConvertError>(())
//! ```
//!
//! ## Modules
//!
//! - [`record`] - Source record model (`SourceRecord`, `SourceField`, `Subfield`)
//! - [`marcxml`] - Loading MARCXML documents
//! - [`normalize`] - Text helpers: splitting, trimming, escaping
//! - [`rules`] - Per-tag mapping rules and the rule registry
//! - [`combine`] - Accumulators for repeatable fields
//! - [`eprint`] - Output record model and builder
//! - [`assembler`] - Per-record conversion
//! - [`writer`] - EPrints XML serialization
//! - [`convert`] - Whole-document conversion driver
//! - [`config`] - Conversion options
//! - [`error`] - Error types

pub mod assembler;
pub mod combine;
pub mod config;
pub mod convert;
pub mod eprint;
pub mod error;
pub mod marcxml;
pub mod normalize;
pub mod record;
pub mod rules;
pub mod writer;

pub use assembler::{AssembledRecord, RecordAssembler};
pub use config::{AbstractJoin, ConversionConfig, DocumentProfile, KeywordShape};
pub use convert::{
    assemble_all, convert_file, convert_str, default_output_path, eprints_xml_from_str,
    ConversionReport,
};
pub use eprint::{DocumentType, EprintRecord, Person, PersonRole};
pub use error::{ConvertError, Result};
pub use marcxml::{extract_records, read_marcxml_file};
pub use record::{SourceField, SourceRecord, Subfield};
pub use writer::{eprints_to_xml, EprintsWriter};
