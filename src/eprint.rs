//! EPrints output records.
//!
//! An [`EprintRecord`] is the flat, lossy projection of one MARC record onto
//! the EPrints import vocabulary. Records are produced by the
//! [`assembler`](crate::assembler) through an [`EprintBuilder`], which
//! collects values in whatever order the source fields arrive and then
//! materializes the record once, so every record has the same element order
//! regardless of source field order.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::normalize::{non_empty, split_name};

/// Relator code recorded on contributors.
pub const CONTRIBUTOR_RELATOR_CODE: &str = "CTB";

/// Relator URI recorded on contributors.
pub const CONTRIBUTOR_RELATOR_URI: &str = "http://www.loc.gov/loc.terms/relators/CTB";

/// Top-level document type of an eprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// Journal article
    Article,
    /// Thesis or dissertation
    Thesis,
}

impl DocumentType {
    /// Value of the `type` element.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Thesis => "thesis",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a person is listed under `creators` or `contributors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonRole {
    /// Listed under `creators`
    Creator,
    /// Listed under `contributors`
    Contributor,
}

/// A creator or contributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// Family name (text before the first comma)
    pub family: String,
    /// Given names (text after the first comma; empty if there was none)
    pub given: String,
    /// Creator or contributor
    pub role: PersonRole,
    /// Relator URI, set for contributors
    pub relator_uri: Option<String>,
}

impl Person {
    /// Build a person from a `"Family, Given"` name string.
    ///
    /// Returns `None` when the family part is blank (`""`, `" , "`,
    /// `", John"`). Contributors get the [`CONTRIBUTOR_RELATOR_URI`].
    ///
    /// ```
    /// use marc2eprints::eprint::{Person, PersonRole};
    ///
    /// let person = Person::from_name("Garcia, Juan Carlos", PersonRole::Creator).unwrap();
    /// assert_eq!(person.family, "Garcia");
    /// assert_eq!(person.given, "Juan Carlos");
    /// ```
    #[must_use]
    pub fn from_name(name: &str, role: PersonRole) -> Option<Self> {
        let name = non_empty(name)?;
        let (family, given) = split_name(name);
        if family.is_empty() {
            return None;
        }
        let relator_uri = match role {
            PersonRole::Creator => None,
            PersonRole::Contributor => Some(CONTRIBUTOR_RELATOR_URI.to_string()),
        };

        Some(Person {
            family: family.to_string(),
            given: given.to_string(),
            role,
            relator_uri,
        })
    }
}

/// Single-valued output elements that mapping rules can set.
///
/// Variants are declared in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    /// `title`
    Title,
    /// `publisher`
    Publisher,
    /// `publication` (journal or series name)
    Publication,
    /// `number` (issue/volume number)
    Number,
    /// `date`
    Date,
    /// `date_type`
    DateType,
    /// `official_url`
    OfficialUrl,
    /// `department`
    Department,
    /// `institution`
    Institution,
    /// `thesis_type`
    ThesisType,
}

impl Element {
    /// Element name in EPrints XML.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Publisher => "publisher",
            Self::Publication => "publication",
            Self::Number => "number",
            Self::Date => "date",
            Self::DateType => "date_type",
            Self::OfficialUrl => "official_url",
            Self::Department => "department",
            Self::Institution => "institution",
            Self::ThesisType => "thesis_type",
        }
    }
}

/// One EPrints record, ready for serialization.
///
/// Every `Option` that is `Some` holds a non-blank, trimmed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EprintRecord {
    /// `title`
    pub title: Option<String>,
    /// `creators`
    pub creators: Vec<Person>,
    /// `contributors`
    pub contributors: Vec<Person>,
    /// `publisher`
    pub publisher: Option<String>,
    /// `publication`
    pub publication: Option<String>,
    /// `number`
    pub number: Option<String>,
    /// `date`
    pub date: Option<String>,
    /// `date_type`
    pub date_type: Option<String>,
    /// `official_url`
    pub official_url: Option<String>,
    /// `department`
    pub department: Option<String>,
    /// `institution`
    pub institution: Option<String>,
    /// `note`
    pub note: Option<String>,
    /// `keywords`
    pub keywords: Option<String>,
    /// `abstract`
    pub abstract_text: Option<String>,
    /// `subjects` items
    pub subjects: Vec<String>,
    /// `type`
    pub doc_type: DocumentType,
    /// `thesis_type`, present exactly when `doc_type` is [`DocumentType::Thesis`]
    pub thesis_type: Option<String>,
}

/// Combined multi-valued fields, attached after all rules have run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedValues {
    /// Combined notes
    pub note: Option<String>,
    /// Combined keywords
    pub keywords: Option<String>,
    /// Combined abstract
    pub abstract_text: Option<String>,
    /// Subject items
    pub subjects: Vec<String>,
}

/// Collects rule output for one record.
#[derive(Debug, Default)]
pub struct EprintBuilder {
    scalars: BTreeMap<Element, String>,
    creators: Vec<Person>,
    contributors: Vec<Person>,
    thesis_marked: bool,
}

impl EprintBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single-valued element.
    ///
    /// Blank values are ignored. The first value set for an element wins;
    /// returns whether this value was stored.
    pub fn set(&mut self, element: Element, value: &str) -> bool {
        let Some(value) = non_empty(value) else {
            return false;
        };
        if let Some(existing) = self.scalars.get(&element) {
            debug!(
                element = element.name(),
                kept = %existing,
                ignored = %value,
                "element already set"
            );
            return false;
        }
        self.scalars.insert(element, value.to_string());
        true
    }

    /// Current value of a single-valued element
    #[must_use]
    pub fn get(&self, element: Element) -> Option<&str> {
        self.scalars.get(&element).map(String::as_str)
    }

    /// Append a creator or contributor, according to its role
    pub fn add_person(&mut self, person: Person) {
        match person.role {
            PersonRole::Creator => self.creators.push(person),
            PersonRole::Contributor => self.contributors.push(person),
        }
    }

    /// Record that a thesis-indicating field was seen
    pub fn mark_thesis(&mut self) {
        self.thesis_marked = true;
    }

    /// Whether a thesis-indicating field was seen
    #[must_use]
    pub fn is_thesis(&self) -> bool {
        self.thesis_marked
    }

    /// Materialize the record.
    ///
    /// `thesis_type` is kept only for theses; a thesis without one gets
    /// `default_thesis_type`.
    #[must_use]
    pub fn build(self, combined: CombinedValues, default_thesis_type: &str) -> EprintRecord {
        let EprintBuilder {
            mut scalars,
            creators,
            contributors,
            thesis_marked,
        } = self;

        let doc_type = if thesis_marked {
            DocumentType::Thesis
        } else {
            DocumentType::Article
        };
        let thesis_type = match doc_type {
            DocumentType::Thesis => scalars
                .remove(&Element::ThesisType)
                .or_else(|| non_empty(default_thesis_type).map(str::to_string)),
            DocumentType::Article => None,
        };
        let mut take = |element: Element| scalars.remove(&element);

        EprintRecord {
            title: take(Element::Title),
            creators,
            contributors,
            publisher: take(Element::Publisher),
            publication: take(Element::Publication),
            number: take(Element::Number),
            date: take(Element::Date),
            date_type: take(Element::DateType),
            official_url: take(Element::OfficialUrl),
            department: take(Element::Department),
            institution: take(Element::Institution),
            note: combined.note,
            keywords: combined.keywords,
            abstract_text: combined.abstract_text,
            subjects: combined.subjects,
            doc_type,
            thesis_type,
        }
    }
}
