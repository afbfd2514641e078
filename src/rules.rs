//! Field mapping rules: MARC tag → EPrints elements.
//!
//! Each recognized tag maps to one [`Rule`]. A rule either sets an output
//! element on the record's [`EprintBuilder`] or appends to one of the
//! record's [`Accumulators`]. Rules are collected in a [`RuleSet`] selected by
//! [`DocumentProfile`], so the article and thesis variants share every rule
//! except the one that differs.
//!
//! Crosswalk:
//! - 245 (Title Statement) → `title` (`$a`, then `$b` after a space)
//! - 100/700 (Personal Name) → `creators` when `$e` is `author`, otherwise
//!   `contributors` with relator CTB
//! - 260 (Imprint) → `institution`/`department` + `thesis_type` (thesis
//!   profile) or `publisher` (article profile); `$c` → `date` + `date_type`
//! - 264 (Production/Publication) → `publisher`, `date`
//! - 500 (General Note) → `note`
//! - 502 (Dissertation Note) → `department`, `thesis_type`
//! - 520 (Summary) → `abstract`
//! - 653/690 (Keywords) → `keywords` or `subjects`
//! - 786 (Data Source Entry) → `publication`, `number`
//! - 787 (Other Relationship Entry) → `official_url`
//!
//! All other tags are ignored.

use indexmap::IndexMap;
use tracing::debug;

use crate::combine::{Accumulator, Accumulators};
use crate::config::{ConversionConfig, DocumentProfile};
use crate::eprint::{Element, EprintBuilder, Person, PersonRole};
use crate::error::{ConvertError, Result};
use crate::normalize::{non_empty, split_on, strip_trailing_char};
use crate::record::SourceField;

/// Relator term (`$e`) that makes a name a creator.
pub const AUTHOR_ROLE: &str = "author";

/// Marker in a degree statement that identifies a doctoral thesis.
pub const DOCTORAL_MARKER: &str = "Doctorado";

/// `thesis_type` value for doctoral theses.
pub const DOCTORAL_THESIS_TYPE: &str = "doctoral";

/// `date_type` value written alongside imprint dates.
pub const PUBLISHED_DATE_TYPE: &str = "published";

/// A field mapping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Title and subtitle (245)
    Title,
    /// Creator or contributor (100, 700)
    Person,
    /// Publisher and date (264)
    Publication,
    /// Degree-granting institution, faculty and degree (260, thesis profile)
    Faculty,
    /// Publisher imprint (260, article profile)
    PublisherImprint,
    /// Official URL (787)
    OfficialUrl,
    /// Publication name and issue number (786)
    SeriesNumber,
    /// Dissertation note (502)
    DissertationNote,
    /// Append `$a` to an accumulator (500, 520, 653, 690)
    Collect(Accumulator),
}

/// Mutable per-record state a rule writes into.
#[derive(Debug)]
pub struct RuleContext<'a> {
    /// Single-valued output elements and people
    pub builder: &'a mut EprintBuilder,
    /// Repeatable values awaiting combination
    pub accumulators: &'a mut Accumulators,
    /// Conversion options
    pub config: &'a ConversionConfig,
}

impl Rule {
    /// Short name used in logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Person => "person",
            Self::Publication => "publication",
            Self::Faculty => "faculty",
            Self::PublisherImprint => "publisher-imprint",
            Self::OfficialUrl => "official-url",
            Self::SeriesNumber => "series-number",
            Self::DissertationNote => "dissertation-note",
            Self::Collect(Accumulator::Notes) => "collect-notes",
            Self::Collect(Accumulator::Keywords) => "collect-keywords",
            Self::Collect(Accumulator::Abstract) => "collect-abstract",
        }
    }

    /// Apply the rule to one field.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::FieldShape`] when a compound value does not
    /// have the expected shape. In that case the rule has written nothing.
    pub fn apply(self, field: &SourceField, ctx: &mut RuleContext<'_>) -> Result<()> {
        match self {
            Self::Title => apply_title(field, ctx.builder),
            Self::Person => apply_person(field, ctx.builder),
            Self::Publication => apply_publication(field, ctx.builder),
            Self::Faculty => apply_faculty(field, ctx.builder),
            Self::PublisherImprint => apply_publisher_imprint(field, ctx.builder),
            Self::OfficialUrl => apply_official_url(field, ctx.builder, ctx.config.url_subfield),
            Self::SeriesNumber => return apply_series_number(field, ctx.builder),
            Self::DissertationNote => apply_dissertation_note(field, ctx.builder),
            Self::Collect(accumulator) => {
                if let Some(value) = field.first_subfield('a') {
                    ctx.accumulators.push(accumulator, value);
                }
            },
        }
        Ok(())
    }
}

/// Rules for one document profile, keyed by tag.
#[derive(Debug, Clone)]
pub struct RuleSet {
    profile: DocumentProfile,
    rules: IndexMap<&'static str, Rule>,
}

impl RuleSet {
    /// Build the rule table for a profile
    #[must_use]
    pub fn for_profile(profile: DocumentProfile) -> Self {
        let imprint = match profile {
            DocumentProfile::Thesis => Rule::Faculty,
            DocumentProfile::Article => Rule::PublisherImprint,
        };

        let rules = IndexMap::from([
            ("100", Rule::Person),
            ("245", Rule::Title),
            ("260", imprint),
            ("264", Rule::Publication),
            ("500", Rule::Collect(Accumulator::Notes)),
            ("502", Rule::DissertationNote),
            ("520", Rule::Collect(Accumulator::Abstract)),
            ("653", Rule::Collect(Accumulator::Keywords)),
            ("690", Rule::Collect(Accumulator::Keywords)),
            ("700", Rule::Person),
            ("786", Rule::SeriesNumber),
            ("787", Rule::OfficialUrl),
        ]);

        RuleSet { profile, rules }
    }

    /// Profile this rule set was built for
    #[must_use]
    pub fn profile(&self) -> DocumentProfile {
        self.profile
    }

    /// Rule for a tag, if the tag is recognized
    #[must_use]
    pub fn rule_for(&self, tag: &str) -> Option<Rule> {
        self.rules.get(tag).copied()
    }

    /// Recognized tags, in registration order
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }
}

/// Map a degree statement to a thesis type.
///
/// Statements naming a doctorate map to `doctoral`; anything else is kept
/// verbatim (trimmed). Blank statements give `None`.
#[must_use]
pub fn thesis_type_from(statement: &str) -> Option<String> {
    if statement.contains(DOCTORAL_MARKER) {
        Some(DOCTORAL_THESIS_TYPE.to_string())
    } else {
        non_empty(statement).map(str::to_string)
    }
}

fn apply_title(field: &SourceField, out: &mut EprintBuilder) {
    let Some(title) = field.non_blank('a') else {
        return;
    };
    match field.non_blank('b') {
        Some(subtitle) => out.set(Element::Title, &format!("{title} {subtitle}")),
        None => out.set(Element::Title, title),
    };
}

fn apply_person(field: &SourceField, out: &mut EprintBuilder) {
    let Some(name) = field.non_blank('a') else {
        debug!(tag = %field.tag, "name field without $a, skipping");
        return;
    };
    let role = match field.first_subfield('e') {
        Some(AUTHOR_ROLE) => PersonRole::Creator,
        _ => PersonRole::Contributor,
    };
    match Person::from_name(name, role) {
        Some(person) => {
            debug!(family = %person.family, given = %person.given, ?role, "adding person");
            out.add_person(person);
        },
        None => debug!(tag = %field.tag, name, "name without family part, skipping"),
    }
}

fn apply_publication(field: &SourceField, out: &mut EprintBuilder) {
    if let Some(publisher) = field.first_subfield('b') {
        out.set(Element::Publisher, publisher);
    }
    if let Some(date) = field.first_subfield('c') {
        out.set(Element::Date, strip_trailing_char(date));
    }
}

fn apply_imprint_date(field: &SourceField, out: &mut EprintBuilder) {
    if let Some(date) = field.first_subfield('c').and_then(|d| non_empty(strip_trailing_char(d))) {
        out.set(Element::Date, date);
        out.set(Element::DateType, PUBLISHED_DATE_TYPE);
    }
}

/// Split `"Institution. Department. ..."` into its first two parts.
fn institution_parts(value: &str) -> (&str, Option<&str>) {
    let parts = split_on(value, '.', 3);
    let institution = parts.first().copied().map_or("", str::trim);
    let department = parts.get(1).copied().and_then(non_empty);
    (institution, department)
}

fn apply_faculty(field: &SourceField, out: &mut EprintBuilder) {
    out.mark_thesis();

    if let Some(value) = field.first_subfield('b') {
        let (institution, department) = institution_parts(value);
        if department.is_none() {
            debug!(tag = %field.tag, value, "no department after institution");
        }
        out.set(Element::Department, department.unwrap_or_default());
        out.set(Element::Institution, institution);
    }
    if let Some(thesis_type) = field.first_subfield('a').and_then(thesis_type_from) {
        out.set(Element::ThesisType, &thesis_type);
    }
    apply_imprint_date(field, out);
}

fn apply_publisher_imprint(field: &SourceField, out: &mut EprintBuilder) {
    if let Some(value) = field.first_subfield('b') {
        let publisher = match institution_parts(value) {
            ("", Some(department)) => department.to_string(),
            (institution, Some(department)) => format!("{institution}, {department}"),
            (institution, None) => institution.to_string(),
        };
        out.set(Element::Publisher, &publisher);
    }
    apply_imprint_date(field, out);
}

fn apply_official_url(field: &SourceField, out: &mut EprintBuilder, code: char) {
    if let Some(url) = field.first_subfield(code) {
        out.set(Element::OfficialUrl, url);
    }
}

/// `"Publication; number: pages"` → `publication`, `number`.
fn apply_series_number(field: &SourceField, out: &mut EprintBuilder) -> Result<()> {
    let Some(value) = field.non_blank('n') else {
        return Ok(());
    };

    let segments = split_on(value, ';', 2);
    let [publication, rest] = segments.as_slice() else {
        return Err(ConvertError::FieldShape {
            tag: field.tag.clone(),
            reason: format!("expected 'publication; number: pages' in $n, found '{value}'"),
        });
    };
    let number = split_on(rest, ':', 2).first().copied().unwrap_or_default();

    out.set(Element::Publication, publication);
    out.set(Element::Number, number);
    Ok(())
}

fn apply_dissertation_note(field: &SourceField, out: &mut EprintBuilder) {
    out.mark_thesis();

    if let Some(department) = field.first_subfield('c') {
        out.set(Element::Department, department);
    }
    if let Some(thesis_type) = field.first_subfield('a').and_then(thesis_type_from) {
        out.set(Element::ThesisType, &thesis_type);
    }
}
