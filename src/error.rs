//! Error types for MARCXML to EPrints conversion.
//!
//! This module provides the [`ConvertError`] type for all conversion
//! operations and the [`Result`] convenience type.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for all conversion operations.
///
/// Only [`ConvertError::InputLoad`], [`ConvertError::OutputSave`] and
/// [`ConvertError::Config`] abort a run. [`ConvertError::FieldShape`] is
/// recovered inside the record assembler and surfaces only as a diagnostic.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input document is missing, unreadable, or not well-formed XML.
    #[error("Failed to load input {path}: {reason}")]
    InputLoad {
        /// Path of the input document (empty for in-memory input).
        path: PathBuf,
        /// What went wrong while loading.
        reason: String,
    },

    /// The output document could not be written.
    #[error("Failed to save output {path}: {source}")]
    OutputSave {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A field does not carry the compound value shape its rule expects.
    #[error("Unexpected shape in field {tag}: {reason}")]
    FieldShape {
        /// Tag of the offending field.
        tag: String,
        /// Description of the expected shape.
        reason: String,
    },

    /// A configuration file could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ConvertError {
    /// Build an [`ConvertError::InputLoad`] for in-memory input.
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ConvertError::InputLoad {
            path: PathBuf::new(),
            reason: reason.into(),
        }
    }

    /// Attach the input path to an [`ConvertError::InputLoad`] raised while parsing.
    #[must_use]
    pub(crate) fn with_input_path(self, input: &std::path::Path) -> Self {
        match self {
            ConvertError::InputLoad { reason, .. } => ConvertError::InputLoad {
                path: input.to_path_buf(),
                reason,
            },
            other => other,
        }
    }

    /// Whether this error ends the whole run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ConvertError::FieldShape { .. })
    }
}

/// Convenience type alias for [`std::result::Result`] with [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_shape_is_not_fatal() {
        let err = ConvertError::FieldShape {
            tag: "786".to_string(),
            reason: "missing ';'".to_string(),
        };
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Unexpected shape in field 786: missing ';'");
    }

    #[test]
    fn test_with_input_path_rewrites_load_errors_only() {
        let err = ConvertError::malformed("no root element").with_input_path("in.xml".as_ref());
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Failed to load input in.xml: no root element"
        );

        let config = ConvertError::Config("bad".to_string()).with_input_path("in.xml".as_ref());
        assert!(matches!(config, ConvertError::Config(_)));
    }
}
