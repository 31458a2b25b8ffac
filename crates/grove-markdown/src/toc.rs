//! Table of contents entries and heading anchors.

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Anchor ID for linking.
    pub id: String,
    /// Heading text as written in the source.
    pub title: String,
}

/// Convert heading text to an anchor ID.
///
/// Lowercases, turns spaces into hyphens and drops everything outside
/// `[a-z0-9-]`. Duplicate headings produce duplicate IDs.
///
/// # Example
///
/// ```
/// use grove_markdown::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("What's New?"), "whats-new");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            'a'..='z' | '0'..='9' | '-' => Some(c),
            _ => None,
        })
        .collect()
}
