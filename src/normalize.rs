//! Value normalization helpers shared by the mapping rules and the writer.
//!
//! Catalog values arrive with stray whitespace, terminal punctuation and
//! compound values packed into one subfield (`"Universidad X. Facultad Y."`,
//! `"Revista; 12: 3-10"`). The helpers here trim, split and escape those
//! values. None of them allocate unless they have to.

/// Escape XML special characters for use as element text.
///
/// Every call escapes its whole input, so the writer applies it exactly once
/// to raw values; escaping an already escaped string escapes it again.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Split on the first `max_parts - 1` occurrences of `delimiter`.
///
/// The last part keeps any further delimiters. A `max_parts` of zero is
/// treated as one (no split).
///
/// ```
/// use marc2eprints::normalize::split_on;
///
/// assert_eq!(split_on("Garcia, Juan, Jr.", ',', 2), vec!["Garcia", " Juan, Jr."]);
/// assert_eq!(split_on("a.b.c.d", '.', 3), vec!["a", "b", "c.d"]);
/// assert_eq!(split_on("plain", ';', 2), vec!["plain"]);
/// ```
#[must_use]
pub fn split_on(s: &str, delimiter: char, max_parts: usize) -> Vec<&str> {
    s.splitn(max_parts.max(1), delimiter).collect()
}

/// Trim, then drop the final character (typically terminal punctuation such
/// as the period in `"2020."`).
#[must_use]
pub fn strip_trailing_char(s: &str) -> &str {
    let trimmed = s.trim();
    match trimmed.char_indices().next_back() {
        Some((idx, _)) => trimmed[..idx].trim_end(),
        None => trimmed,
    }
}

/// Trim and return `None` for blank input.
#[must_use]
pub fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Split a personal name on its first comma into `(family, given)`.
///
/// Both parts are trimmed; `given` is empty when there is no comma.
#[must_use]
pub fn split_name(name: &str) -> (&str, &str) {
    let mut parts = split_on(name, ',', 2).into_iter();
    let family = parts.next().unwrap_or_default().trim();
    let given = parts.next().unwrap_or_default().trim();
    (family, given)
}
