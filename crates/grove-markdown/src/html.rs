//! HTML text helpers shared by the inline formatter and summary extraction.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Escape special HTML characters.
///
/// # Example
///
/// ```
/// use grove_markdown::escape_html;
///
/// assert_eq!(escape_html("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Decode the entities produced by [`escape_html`].
///
/// `&amp;` is decoded last so that `&amp;lt;` round-trips to `&lt;`.
pub(crate) fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Remove all tags and decode entities, producing plain text.
pub(crate) fn to_plain_text(html: &str) -> String {
    let stripped = TAG_RE.replace_all(html, "");
    decode_entities(&stripped).trim().to_owned()
}
