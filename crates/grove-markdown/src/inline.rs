//! Inline formatting: escaping, code spans, links and emphasis.
//!
//! The pipeline order is fixed. Text is HTML-escaped first so literal tags in
//! the source can never reach the output, then code spans and link targets are
//! set aside before emphasis runs, so `*` or `_` inside them stay literal.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::html::escape_html;

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static STRONG_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static STRONG_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_]+)__").unwrap());
static EM_STAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static EM_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_([^_]+)_").unwrap());

/// Fragments already converted to HTML that later stages must not touch.
///
/// Stashed fragments are referenced as `<N>`. After escaping, the working text
/// contains no raw `<`, so the markers cannot collide with source text.
#[derive(Default)]
struct Stash {
    fragments: Vec<String>,
}

impl Stash {
    fn protect(&mut self, html: String) -> String {
        let marker = format!("<{}>", self.fragments.len());
        self.fragments.push(html);
        marker
    }

    /// Later fragments may embed markers of earlier ones, so restore newest first.
    fn restore(self, mut text: String) -> String {
        for (idx, fragment) in self.fragments.iter().enumerate().rev() {
            text = text.replace(&format!("<{idx}>"), fragment);
        }
        text
    }
}

/// Render a single run of inline text to HTML.
///
/// Malformed markers are left as literal text; this never fails.
///
/// # Example
///
/// ```
/// use grove_markdown::render_inline;
///
/// let html = render_inline("**bold** and `a*b*c` and [docs](https://example.com)");
/// assert_eq!(
///     html,
///     r#"<strong>bold</strong> and <code>a*b*c</code> and <a href="https://example.com">docs</a>"#
/// );
/// ```
#[must_use]
pub fn render_inline(text: &str) -> String {
    let mut stash = Stash::default();

    let escaped = escape_html(text);

    let with_code = CODE_RE.replace_all(&escaped, |caps: &Captures<'_>| {
        stash.protect(format!("<code>{}</code>", &caps[1]))
    });

    let with_links = LINK_RE.replace_all(&with_code, |caps: &Captures<'_>| {
        let open = stash.protect(format!(r#"<a href="{}">"#, &caps[2]));
        format!("{open}{}</a>", &caps[1])
    });

    let text = STRONG_STAR_RE.replace_all(&with_links, "<strong>$1</strong>");
    let text = STRONG_UNDERSCORE_RE.replace_all(&text, "<strong>$1</strong>");
    let text = EM_STAR_RE.replace_all(&text, "<em>$1</em>");
    let text = EM_UNDERSCORE_RE.replace_all(&text, "<em>$1</em>");

    stash.restore(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(render_inline("Just some words."), "Just some words.");
    }

    #[test]
    fn test_bold() {
        assert_eq!(render_inline("**bold text**"), "<strong>bold text</strong>");
        assert_eq!(render_inline("__bold text__"), "<strong>bold text</strong>");
    }

    #[test]
    fn test_italic() {
        assert_eq!(render_inline("*italic text*"), "<em>italic text</em>");
        assert_eq!(render_inline("_italic text_"), "<em>italic text</em>");
    }

    #[test]
    fn test_bold_and_italic_together() {
        let html = render_inline("**bold** and *italic* and `code`");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn test_code_span_protects_emphasis_markers() {
        assert_eq!(render_inline("`*not* __em__`"), "<code>*not* __em__</code>");
    }

    #[test]
    fn test_code_span_is_escaped() {
        assert_eq!(
            render_inline("`<div>&</div>`"),
            "<code>&lt;div&gt;&amp;&lt;/div&gt;</code>"
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            render_inline("[link](https://example.com)"),
            r#"<a href="https://example.com">link</a>"#
        );
    }

    #[test]
    fn test_link_target_protected_from_emphasis() {
        assert_eq!(
            render_inline("[docs](https://example.com/a_b_c)"),
            r#"<a href="https://example.com/a_b_c">docs</a>"#
        );
    }

    #[test]
    fn test_link_text_gets_emphasis() {
        assert_eq!(
            render_inline("[**docs**](/guide)"),
            r#"<a href="/guide"><strong>docs</strong></a>"#
        );
    }

    #[test]
    fn test_code_inside_link_text() {
        assert_eq!(
            render_inline("[`cfg`](/config)"),
            r#"<a href="/config"><code>cfg</code></a>"#
        );
    }

    #[test]
    fn test_link_href_is_escaped() {
        assert_eq!(
            render_inline(r#"[x](/a?b=1&c="2")"#),
            r#"<a href="/a?b=1&amp;c=&quot;2&quot;">x</a>"#
        );
    }

    #[test]
    fn test_html_is_escaped() {
        assert_eq!(
            render_inline("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escaping_happens_before_markup() {
        assert_eq!(render_inline("**<b>**"), "<strong>&lt;b&gt;</strong>");
    }

    #[test]
    fn test_unclosed_markers_left_literal() {
        assert_eq!(render_inline("**unclosed"), "**unclosed");
        assert_eq!(render_inline("`unclosed"), "`unclosed");
        assert_eq!(render_inline("[text](no-close"), "[text](no-close");
    }

    #[test]
    fn test_many_code_spans_restore_in_place() {
        let input: String = (0..12).map(|i| format!("`c{i}` ")).collect();
        let html = render_inline(input.trim_end());
        for i in 0..12 {
            assert!(
                html.contains(&format!("<code>c{i}</code>")),
                "missing c{i} in {html}"
            );
        }
        assert!(!html.contains("<1>"));
    }

    #[test]
    fn test_angle_digits_in_source_are_escaped_not_restored() {
        assert_eq!(render_inline("`x` <0>"), "<code>x</code> &lt;0&gt;");
    }
}
