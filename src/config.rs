//! Configuration options for EPrints conversion.
//!
//! This module provides the [`ConversionConfig`] struct which controls which
//! rule profile is applied and how multi-valued fields are combined.
//!
//! Configuration can be built in code, or loaded from a JSON file where every
//! key is optional:
//!
//! ```json
//! {
//!   "profile": "thesis",
//!   "abstract_join": "sentence",
//!   "keyword_shape": "subject_items",
//!   "url_subfield": "u",
//!   "default_thesis_type": "maestria",
//!   "parallel": true
//! }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Rule profile: which variant of the field mapping applies.
///
/// The two profiles differ only in how the 260 field is read: as the
/// degree-granting institution and faculty of a thesis, or as the publisher
/// imprint of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentProfile {
    /// Journal articles
    Article,
    /// Theses and dissertations
    #[default]
    Thesis,
}

impl fmt::Display for DocumentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Article => write!(f, "article"),
            Self::Thesis => write!(f, "thesis"),
        }
    }
}

impl FromStr for DocumentProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "article" => Ok(Self::Article),
            "thesis" => Ok(Self::Thesis),
            other => Err(format!("unknown profile '{other}' (expected article or thesis)")),
        }
    }
}

/// How abstract fragments from repeated 520 fields are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbstractJoin {
    /// `"A, B, C"`
    #[default]
    Comma,
    /// `"A. B. C."`: each fragment's own terminal period is dropped, fragments
    /// are joined with `". "` and a single period closes the text
    Sentence,
}

impl fmt::Display for AbstractJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comma => write!(f, "comma"),
            Self::Sentence => write!(f, "sentence"),
        }
    }
}

impl FromStr for AbstractJoin {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "comma" => Ok(Self::Comma),
            "sentence" => Ok(Self::Sentence),
            other => Err(format!("unknown abstract join '{other}' (expected comma or sentence)")),
        }
    }
}

/// Output shape for keyword fields (653, 690).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordShape {
    /// One `keywords` element, values joined with `", "`
    #[default]
    Combined,
    /// One `subjects` element with an `item` child per value
    SubjectItems,
}

/// Configuration for EPrints conversion.
///
/// # Examples
///
/// ```
/// use marc2eprints::config::{ConversionConfig, DocumentProfile};
///
/// let config = ConversionConfig {
///     profile: DocumentProfile::Article,
///     ..Default::default()
/// };
/// assert_eq!(config.url_subfield, 'n');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Rule profile applied to every record.
    pub profile: DocumentProfile,

    /// Separator policy for abstract fragments.
    pub abstract_join: AbstractJoin,

    /// Whether keywords are combined or listed as subject items.
    pub keyword_shape: KeywordShape,

    /// Subfield code of 787 holding the official URL.
    pub url_subfield: char,

    /// Thesis type assigned when a thesis record names none.
    pub default_thesis_type: String,

    /// Assemble records on the rayon thread pool.
    ///
    /// Output order is the same either way.
    pub parallel: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            profile: DocumentProfile::default(),
            abstract_join: AbstractJoin::default(),
            keyword_shape: KeywordShape::default(),
            url_subfield: 'n',
            default_thesis_type: "maestria".to_string(),
            parallel: false,
        }
    }
}

impl ConversionConfig {
    /// Create a default configuration for the given profile.
    #[must_use]
    pub fn for_profile(profile: DocumentProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Config`] if the file cannot be read or parsed,
    /// or if the resulting configuration is invalid.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
            .map_err(|e| ConvertError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Config`] if the JSON is invalid.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConvertError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the rules rely on.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Config`] for a blank default thesis type or a
    /// whitespace URL subfield code.
    pub fn validate(&self) -> Result<()> {
        if self.default_thesis_type.trim().is_empty() {
            return Err(ConvertError::Config(
                "default_thesis_type must not be blank".to_string(),
            ));
        }
        if self.url_subfield.is_whitespace() {
            return Err(ConvertError::Config(
                "url_subfield must be a subfield code".to_string(),
            ));
        }
        Ok(())
    }
}
