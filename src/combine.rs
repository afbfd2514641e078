//! Per-record accumulators for repeatable fields.
//!
//! Notes (500), abstracts (520) and keywords (653/690) may occur any number
//! of times in a record. Rules append each occurrence to an [`Accumulators`]
//! list; once every field has been processed the lists are joined into a
//! single value with [`combine`]. An empty list yields no value at all, so no
//! empty element is ever written.

use crate::config::{AbstractJoin, KeywordShape};
use crate::eprint::CombinedValues;
use crate::normalize::non_empty;

/// Separator between combined notes and between combined keywords.
pub const LIST_SEPARATOR: &str = ", ";

/// Separator between abstract fragments under [`AbstractJoin::Sentence`].
pub const SENTENCE_SEPARATOR: &str = ". ";

/// Which accumulator a rule appends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accumulator {
    /// General notes
    Notes,
    /// Keywords / uncontrolled subject terms
    Keywords,
    /// Abstract fragments
    Abstract,
}

/// Join `values` with `separator`; `None` for an empty list.
///
/// ```
/// use marc2eprints::combine::combine;
///
/// let parts = vec!["A".to_string(), "B".to_string(), "C".to_string()];
/// assert_eq!(combine(&parts, ", ").as_deref(), Some("A, B, C"));
/// assert_eq!(combine(&[], ", "), None);
/// ```
#[must_use]
pub fn combine(values: &[String], separator: &str) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(separator))
    }
}

/// Join abstract fragments according to the configured policy.
#[must_use]
pub fn combine_abstract(fragments: &[String], join: AbstractJoin) -> Option<String> {
    match join {
        AbstractJoin::Comma => combine(fragments, LIST_SEPARATOR),
        AbstractJoin::Sentence => {
            let sentences: Vec<String> = fragments
                .iter()
                .filter_map(|f| non_empty(f.trim_end_matches('.')))
                .map(str::to_string)
                .collect();
            combine(&sentences, SENTENCE_SEPARATOR).map(|text| text + ".")
        },
    }
}

/// Accumulated values of one record.
#[derive(Debug, Default)]
pub struct Accumulators {
    notes: Vec<String>,
    keywords: Vec<String>,
    abstract_fragments: Vec<String>,
}

impl Accumulators {
    /// Create empty accumulators
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value; blank values are skipped
    pub fn push(&mut self, accumulator: Accumulator, value: &str) {
        let Some(value) = non_empty(value) else {
            return;
        };
        let list = match accumulator {
            Accumulator::Notes => &mut self.notes,
            Accumulator::Keywords => &mut self.keywords,
            Accumulator::Abstract => &mut self.abstract_fragments,
        };
        list.push(value.to_string());
    }

    /// Values collected so far for one accumulator
    #[must_use]
    pub fn values(&self, accumulator: Accumulator) -> &[String] {
        match accumulator {
            Accumulator::Notes => &self.notes,
            Accumulator::Keywords => &self.keywords,
            Accumulator::Abstract => &self.abstract_fragments,
        }
    }

    /// Combine every accumulator into its output value
    #[must_use]
    pub fn finish(self, abstract_join: AbstractJoin, keyword_shape: KeywordShape) -> CombinedValues {
        let (keywords, subjects) = match keyword_shape {
            KeywordShape::Combined => (combine(&self.keywords, LIST_SEPARATOR), Vec::new()),
            KeywordShape::SubjectItems => (None, self.keywords),
        };

        CombinedValues {
            note: combine(&self.notes, LIST_SEPARATOR),
            keywords,
            abstract_text: combine_abstract(&self.abstract_fragments, abstract_join),
            subjects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_combine_single_value_has_no_separator() {
        assert_eq!(combine(&strings(&["only"]), ", ").as_deref(), Some("only"));
    }

    #[test]
    fn test_combine_abstract_sentence() {
        let fragments = strings(&["First part.", "Second part", "Third."]);
        assert_eq!(
            combine_abstract(&fragments, AbstractJoin::Sentence).as_deref(),
            Some("First part. Second part. Third.")
        );
        assert_eq!(
            combine_abstract(&fragments, AbstractJoin::Comma).as_deref(),
            Some("First part., Second part, Third.")
        );
        assert_eq!(combine_abstract(&[], AbstractJoin::Sentence), None);
    }

    #[test]
    fn test_sentence_join_ignores_punctuation_only_fragments() {
        let fragments = strings(&["...", "Body"]);
        assert_eq!(
            combine_abstract(&fragments, AbstractJoin::Sentence).as_deref(),
            Some("Body.")
        );
    }

    #[test]
    fn test_push_skips_blank_values() {
        let mut acc = Accumulators::new();
        acc.push(Accumulator::Notes, "  ");
        acc.push(Accumulator::Notes, " Note one ");
        assert_eq!(acc.values(Accumulator::Notes), &["Note one".to_string()]);
        assert!(acc.values(Accumulator::Keywords).is_empty());
    }

    #[test]
    fn test_finish_combined_keywords() {
        let mut acc = Accumulators::new();
        acc.push(Accumulator::Keywords, "economía");
        acc.push(Accumulator::Keywords, "finanzas");
        acc.push(Accumulator::Notes, "n1");
        acc.push(Accumulator::Notes, "n2");

        let combined = acc.finish(AbstractJoin::Comma, KeywordShape::Combined);
        assert_eq!(combined.keywords.as_deref(), Some("economía, finanzas"));
        assert_eq!(combined.note.as_deref(), Some("n1, n2"));
        assert_eq!(combined.abstract_text, None);
        assert!(combined.subjects.is_empty());
    }

    #[test]
    fn test_finish_subject_items() {
        let mut acc = Accumulators::new();
        acc.push(Accumulator::Keywords, "economía");
        acc.push(Accumulator::Keywords, "finanzas");

        let combined = acc.finish(AbstractJoin::Comma, KeywordShape::SubjectItems);
        assert_eq!(combined.keywords, None);
        assert_eq!(combined.subjects, strings(&["economía", "finanzas"]));
    }
}
