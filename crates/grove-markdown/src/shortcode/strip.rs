//! Shortcode removal for plain-text contexts such as search indexes.

use super::tag::{TagScanner, is_standalone};

/// Remove shortcode syntax from a document without rendering anything.
///
/// Block shortcodes are removed together with their bodies, inline and
/// unterminated tags are removed on their own. Stray closing tags and
/// malformed `{{` sequences are kept, as is everything inside fenced code.
///
/// # Example
///
/// ```
/// use grove_markdown::strip_shortcodes;
///
/// let doc = "Intro {{< kbd key=\"K\" >}} text.\n{{% note %}}\nhidden\n{{% /note %}}\nEnd";
/// assert_eq!(strip_shortcodes(doc), "Intro  text.\n\nEnd");
/// ```
#[must_use]
pub fn strip_shortcodes(document: &str) -> String {
    let mut output = String::with_capacity(document.len());
    let mut scanner = TagScanner::new(document);
    let mut copied = 0;

    while let Some(tag) = scanner.next_tag() {
        output.push_str(&document[copied..tag.span.start]);
        copied = tag.span.end;

        if tag.is_closing {
            output.push_str(tag.source(document));
            continue;
        }

        if is_standalone(document, &tag.span)
            && let Some(closer) = scanner.find_closer(&tag)
        {
            copied = closer.tag.span.end;
            scanner.seek(copied);
        }
    }

    output.push_str(&document[copied..]);
    output
}
