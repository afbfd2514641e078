//! Record assembly: one [`SourceRecord`] in, one [`EprintRecord`] out.
//!
//! Assembly runs in four steps:
//! 1. every field is dispatched, in document order, to the rule registered
//!    for its tag (unknown tags are skipped);
//! 2. the notes, keywords and abstract accumulators are combined;
//! 3. the record is classified as thesis or article, and a thesis without an
//!    explicit type gets the configured default;
//! 4. the output record is materialized in its fixed element order.
//!
//! A rule that finds a malformed compound value reports
//! [`ConvertError::FieldShape`]; the assembler logs it, keeps it in
//! [`AssembledRecord::recovered`], and carries on with the next field.
//!
//! # Examples
//!
//! ```
//! use marc2eprints::{ConversionConfig, RecordAssembler, SourceField, SourceRecord};
//! use marc2eprints::eprint::DocumentType;
//!
//! let record = SourceRecord::builder()
//!     .field(SourceField::builder("245").subfield('a', "Title One").build())
//!     .field(
//!         SourceField::builder("100")
//!             .subfield('a', "Smith, John")
//!             .subfield('e', "author")
//!             .build(),
//!     )
//!     .field(SourceField::builder("520").subfield('a', "Summary text").build())
//!     .build();
//!
//! let config = ConversionConfig::default();
//! let assembled = RecordAssembler::new(&config)?.assemble(&record);
//! let eprint = assembled.eprint;
//!
//! assert_eq!(eprint.title.as_deref(), Some("Title One"));
//! assert_eq!(eprint.creators[0].family, "Smith");
//! assert_eq!(eprint.abstract_text.as_deref(), Some("Summary text"));
//! assert_eq!(eprint.doc_type, DocumentType::Article);
//! # Ok::<(), marc2eprints::ConvertError>(())
//! ```

use tracing::{trace, warn};

use crate::combine::Accumulators;
use crate::config::ConversionConfig;
use crate::eprint::{EprintBuilder, EprintRecord};
use crate::error::{ConvertError, Result};
use crate::record::SourceRecord;
use crate::rules::{RuleContext, RuleSet};

/// Output of [`RecordAssembler::assemble`].
#[derive(Debug)]
pub struct AssembledRecord {
    /// The converted record
    pub eprint: EprintRecord,
    /// Field shape errors recovered while converting; the affected elements
    /// were omitted
    pub recovered: Vec<ConvertError>,
}

/// Converts source records with one configuration.
///
/// The assembler holds no per-record state and can be shared across threads.
#[derive(Debug)]
pub struct RecordAssembler<'a> {
    config: &'a ConversionConfig,
    rules: RuleSet,
}

impl<'a> RecordAssembler<'a> {
    /// Create an assembler using the rule set of the configured profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Config`] if the configuration is invalid,
    /// for instance a blank default thesis type.
    pub fn new(config: &'a ConversionConfig) -> Result<Self> {
        config.validate()?;
        Ok(RecordAssembler {
            config,
            rules: RuleSet::for_profile(config.profile),
        })
    }

    /// Rule set in use
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Convert one record.
    #[must_use]
    pub fn assemble(&self, record: &SourceRecord) -> AssembledRecord {
        let mut builder = EprintBuilder::new();
        let mut accumulators = Accumulators::new();
        let mut recovered = Vec::new();

        for field in record.fields() {
            let Some(rule) = self.rules.rule_for(&field.tag) else {
                trace!(tag = %field.tag, "no rule for tag");
                continue;
            };
            trace!(tag = %field.tag, rule = rule.name(), "applying rule");

            let mut ctx = RuleContext {
                builder: &mut builder,
                accumulators: &mut accumulators,
                config: self.config,
            };
            if let Err(err) = rule.apply(field, &mut ctx) {
                warn!(error = %err, "omitting malformed field");
                recovered.push(err);
            }
        }

        let combined = accumulators.finish(self.config.abstract_join, self.config.keyword_shape);
        let eprint = builder.build(combined, &self.config.default_thesis_type);
        trace!(doc_type = %eprint.doc_type, "record assembled");

        AssembledRecord { eprint, recovered }
    }
}
