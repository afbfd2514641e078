//! Whole-document conversion: load, assemble every record, save.
//!
//! A run either succeeds as a whole or fails without touching the output
//! path: the input is fully parsed before any record is converted, and the
//! output document is built in memory and written in one go.
//!
//! Records are independent, so with [`ConversionConfig::parallel`] set they
//! are assembled on the rayon thread pool. Output order matches input order
//! either way.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::assembler::{AssembledRecord, RecordAssembler};
use crate::config::ConversionConfig;
use crate::error::{ConvertError, Result};
use crate::marcxml::{extract_records, read_marcxml_file};
use crate::record::SourceRecord;
use crate::writer::EprintsWriter;

/// Suffix appended to the input file stem to name the default output.
pub const OUTPUT_SUFFIX: &str = "_eprints.xml";

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Number of `record` elements read, equal to the number of `eprint`
    /// elements written
    pub records: usize,
    /// Number of malformed fields that were omitted
    pub recovered: usize,
}

/// Assemble every record, preserving order.
///
/// # Errors
///
/// Returns [`ConvertError::Config`] if the configuration is invalid.
pub fn assemble_all(
    records: &[SourceRecord],
    config: &ConversionConfig,
) -> Result<Vec<AssembledRecord>> {
    let assembler = RecordAssembler::new(config)?;
    let assembled = if config.parallel {
        records.par_iter().map(|r| assembler.assemble(r)).collect()
    } else {
        records.iter().map(|r| assembler.assemble(r)).collect()
    };
    Ok(assembled)
}

/// Convert a MARCXML document held in memory to EPrints XML.
///
/// # Errors
///
/// Returns [`ConvertError::Config`] for an invalid configuration and
/// [`ConvertError::InputLoad`] if the document is not well-formed.
pub fn eprints_xml_from_str(xml: &str, config: &ConversionConfig) -> Result<String> {
    convert_str(xml, config).map(|(output, _)| output)
}

/// Like [`eprints_xml_from_str`], also returning the conversion report.
///
/// # Errors
///
/// Returns [`ConvertError::Config`] for an invalid configuration and
/// [`ConvertError::InputLoad`] if the document is not well-formed.
pub fn convert_str(xml: &str, config: &ConversionConfig) -> Result<(String, ConversionReport)> {
    config.validate()?;
    let records = extract_records(xml)?;
    debug!(records = records.len(), "records found");
    let (bytes, report) = render(&records, config)?;
    let output = String::from_utf8(bytes).map_err(|e| ConvertError::malformed(e.to_string()))?;
    Ok((output, report))
}

/// Convert a MARCXML file into an EPrints XML file.
///
/// # Errors
///
/// Returns [`ConvertError::Config`] for an invalid configuration,
/// [`ConvertError::InputLoad`] if the input cannot be loaded (nothing is
/// written in either case) and [`ConvertError::OutputSave`] if the output
/// cannot be written.
pub fn convert_file(
    input: &Path,
    output: &Path,
    config: &ConversionConfig,
) -> Result<ConversionReport> {
    config.validate()?;
    info!(input = %input.display(), output = %output.display(), profile = %config.profile, "converting");

    let records = read_marcxml_file(input)?;
    info!(records = records.len(), "records found");

    let (bytes, report) = render(&records, config)?;
    std::fs::write(output, bytes).map_err(|source| ConvertError::OutputSave {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        records = report.records,
        recovered = report.recovered,
        output = %output.display(),
        "conversion complete"
    );
    Ok(report)
}

/// Default output path: `<input dir>/<input stem>_eprints.xml`.
///
/// ```
/// use std::path::Path;
/// use marc2eprints::convert::default_output_path;
///
/// assert_eq!(
///     default_output_path(Path::new("data/tesis-maef.xml")),
///     Path::new("data/tesis-maef_eprints.xml")
/// );
/// ```
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map_or_else(|| OsString::from("output"), OsString::from);
    name.push(OUTPUT_SUFFIX);
    input.with_file_name(name)
}

fn render(
    records: &[SourceRecord],
    config: &ConversionConfig,
) -> Result<(Vec<u8>, ConversionReport)> {
    let assembled = assemble_all(records, config)?;
    let recovered = assembled.iter().map(|a| a.recovered.len()).sum();

    let mut writer = EprintsWriter::new(Vec::new());
    for (idx, record) in assembled.iter().enumerate() {
        debug!(record = idx + 1, doc_type = %record.eprint.doc_type, "writing eprint");
        // Writing into a Vec cannot fail.
        writer.write_record(&record.eprint).ok();
    }
    let bytes = writer.finish().unwrap_or_default();

    let report = ConversionReport {
        records: assembled.len(),
        recovered,
    };
    Ok((bytes, report))
}
