//! Document rendering.
//!
//! [`render`] runs the full pipeline on one document:
//!
//! 1. Shortcodes are expanded into placeholder tokens (when a shortcode
//!    renderer is configured).
//! 2. The placeholder-bearing text is split into blocks and each block is
//!    written as HTML, collecting TOC entries and the summary paragraph.
//! 3. Placeholder tokens are replaced with the stored shortcode HTML.
//!
//! All state lives in the call, so independent documents can be rendered
//! concurrently.

use std::borrow::Cow;

use crate::RenderOptions;
use crate::block::{Block, BlockKind, BlockScanner};
use crate::html::{escape_html, to_plain_text};
use crate::inline::render_inline;
use crate::shortcode::{Expander, Placeholders};
use crate::toc::{TocEntry, slugify};

/// Marker appended to truncated summaries.
const ELLIPSIS: &str = "...";

/// Result of rendering a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Table of contents entries in document order.
    pub toc: Vec<TocEntry>,
    /// Plain text of the first paragraph, truncated with `...`.
    pub summary: String,
}

/// Render a markdown document to HTML.
///
/// Never fails: malformed markup degrades to literal text and shortcode
/// problems are reported as warnings through `tracing` and the options'
/// warning sink.
///
/// # Example
///
/// ```
/// use grove_markdown::{RenderOptions, render};
///
/// let result = render("# Hello World\n\nFirst *paragraph*.", &RenderOptions::<()>::new());
///
/// assert_eq!(
///     result.html,
///     "<h1 id=\"hello-world\">Hello World</h1>\n<p>First <em>paragraph</em>.</p>\n"
/// );
/// assert_eq!(result.toc[0].id, "hello-world");
/// assert_eq!(result.summary, "First paragraph.");
/// ```
#[must_use]
pub fn render<P: ?Sized>(document: &str, options: &RenderOptions<'_, P>) -> RenderResult {
    render_at_depth(document, options, 0)
}

/// Render a document whose block shortcodes are nested `depth` levels deep.
pub(crate) fn render_at_depth<P: ?Sized>(
    document: &str,
    options: &RenderOptions<'_, P>,
    depth: usize
) -> RenderResult {
    let mut placeholders = Placeholders::for_source(document);

    let source = match options.shortcodes {
        Some(shortcodes) => {
            let mut expander = Expander::new(options, shortcodes, depth);
            let expanded = expander.expand(document, &mut placeholders);
            tracing::debug!(
                depth,
                shortcodes = expander.expanded(),
                "Expanded shortcodes"
            );
            Cow::Owned(expanded)
        }
        None => Cow::Borrowed(document),
    };

    let lines: Vec<&str> = source.lines().collect();
    let mut writer = HtmlWriter::new(&placeholders, !options.skip_toc);
    for block in BlockScanner::new(&lines, &placeholders) {
        writer.write_block(&block);
    }

    let summary = writer.summary.as_deref().map_or_else(String::new, |html| {
        let text = to_plain_text(&placeholders.substitute(html));
        truncate_summary(&text, options.summary_length)
    });

    RenderResult {
        html: placeholders.substitute(&writer.output),
        toc: writer.toc,
        summary,
    }
}

/// Accumulates block HTML and derived metadata for one render call.
struct HtmlWriter<'p> {
    placeholders: &'p Placeholders,
    collect_toc: bool,
    output: String,
    toc: Vec<TocEntry>,
    /// HTML of the first paragraph with text, placeholders unsubstituted.
    summary: Option<String>,
}

impl<'p> HtmlWriter<'p> {
    fn new(placeholders: &'p Placeholders, collect_toc: bool) -> Self {
        Self {
            placeholders,
            collect_toc,
            output: String::new(),
            toc: Vec::new(),
            summary: None,
        }
    }

    fn write_block(&mut self, block: &Block<'_, '_>) {
        match block.kind {
            BlockKind::Heading { level } => self.write_heading(level, block.lines[0]),
            BlockKind::Paragraph => self.write_paragraph(block.lines),
            BlockKind::CodeBlock { language, closed } => {
                let end = if closed {
                    block.lines.len() - 1
                } else {
                    block.lines.len()
                };
                self.write_code_block(language, &block.lines[1..end]);
            }
            BlockKind::Blockquote => self.write_blockquote(block.lines),
            BlockKind::UnorderedList => {
                self.write_list("ul", block.lines, strip_unordered_marker);
            }
            BlockKind::OrderedList => self.write_list("ol", block.lines, strip_ordered_marker),
            BlockKind::Rule => self.output.push_str("<hr>\n"),
            BlockKind::Blank => {}
            BlockKind::Placeholder => {
                self.output.push_str(block.lines[0].trim());
                self.output.push('\n');
            }
        }
    }

    fn write_heading(&mut self, level: u8, line: &str) {
        // Only the clamped level's worth of `#` is markup; the rest is text.
        let text = line[usize::from(level)..].trim();
        let title = self.placeholders.substitute_plain(text);
        let id = slugify(&title);

        self.output.push_str(&format!(
            "<h{level} id=\"{id}\">{}</h{level}>\n",
            render_inline(text)
        ));

        if self.collect_toc {
            self.toc.push(TocEntry { level, id, title });
        }
    }

    fn write_paragraph(&mut self, lines: &[&str]) {
        let text = lines
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join(" ");
        let html = render_inline(&text);

        if self.summary.is_none() && !text.is_empty() {
            self.summary = Some(html.clone());
        }

        self.output.push_str("<p>");
        self.output.push_str(&html);
        self.output.push_str("</p>\n");
    }

    fn write_code_block(&mut self, language: Option<&str>, lines: &[&str]) {
        let code = escape_html(&lines.join("\n"));
        match language {
            Some(language) => self.output.push_str(&format!(
                "<pre><code class=\"language-{}\">{code}</code></pre>\n",
                escape_html(language)
            )),
            None => self
                .output
                .push_str(&format!("<pre><code>{code}</code></pre>\n")),
        }
    }

    fn write_blockquote(&mut self, lines: &[&str]) {
        let text = lines
            .iter()
            .map(|l| {
                let trimmed = l.trim();
                let quoted = trimmed.strip_prefix('>').unwrap_or(trimmed);
                quoted.strip_prefix(' ').unwrap_or(quoted)
            })
            .collect::<Vec<_>>()
            .join("\n");

        self.output.push_str("<blockquote><p>");
        self.output.push_str(&render_inline(text.trim()));
        self.output.push_str("</p></blockquote>\n");
    }

    fn write_list(&mut self, tag: &str, lines: &[&str], strip_marker: fn(&str) -> &str) {
        self.output.push('<');
        self.output.push_str(tag);
        self.output.push_str(">\n");
        for line in lines {
            self.output.push_str("<li>");
            self.output.push_str(&render_inline(strip_marker(line)));
            self.output.push_str("</li>\n");
        }
        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push_str(">\n");
    }
}

fn strip_unordered_marker(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed
        .strip_prefix(['-', '*', '+'])
        .unwrap_or(trimmed)
        .trim()
}

fn strip_ordered_marker(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed
        .split_once('.')
        .map_or(trimmed, |(_, rest)| rest.trim())
}

/// Cut `text` to at most `max_chars` characters, appending an ellipsis if cut.
fn truncate_summary(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}{ELLIPSIS}", &text[..end]),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ShortcodeCall, ShortcodeError, ShortcodeWarning};

    fn render_plain(document: &str) -> RenderResult {
        render(document, &RenderOptions::<()>::new())
    }

    fn echo(call: &ShortcodeCall<'_>, _page: Option<&()>) -> Result<String, ShortcodeError> {
        Ok(format!(
            "<div data-name=\"{}\" data-inner-is-html=\"{}\">{}</div>",
            call.name, call.inner_is_html, call.inner
        ))
    }

    fn only_a(call: &ShortcodeCall<'_>, _page: Option<&()>) -> Result<String, ShortcodeError> {
        if call.name == "a" {
            Ok("<span>A</span>".to_owned())
        } else {
            Err(ShortcodeError::NotFound {
                name: call.name.to_owned(),
            })
        }
    }

    #[test]
    fn test_heading_and_toc() {
        let result = render_plain("# Hello World");

        assert_eq!(result.html, "<h1 id=\"hello-world\">Hello World</h1>\n");
        assert_eq!(
            result.toc,
            vec![TocEntry {
                level: 1,
                id: "hello-world".to_owned(),
                title: "Hello World".to_owned(),
            }]
        );
    }

    #[test]
    fn test_heading_levels_and_duplicates() {
        let result = render_plain("## Setup\n### Setup\n######## Deep");

        let levels: Vec<u8> = result.toc.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![2, 3, 6]);
        assert_eq!(result.toc[0].id, result.toc[1].id);
        assert!(result.html.contains("<h6 id=\"-deep\">## Deep</h6>"));
        assert_eq!(result.toc[2].title, "## Deep");
    }

    #[test]
    fn test_heading_over_six_keeps_extra_hashes() {
        let result = render_plain("######## Deep");

        assert_eq!(result.html, "<h6 id=\"-deep\">## Deep</h6>\n");
    }

    #[test]
    fn test_skip_toc() {
        let options = RenderOptions::<()>::new().with_skip_toc(true);
        let result = render("# Title", &options);

        assert!(result.toc.is_empty());
        assert_eq!(result.html, "<h1 id=\"title\">Title</h1>\n");
    }

    #[test]
    fn test_inline_formatting() {
        let result = render_plain("**bold** and *italic* and `code`");

        assert!(result.html.contains("<strong>bold</strong>"));
        assert!(result.html.contains("<em>italic</em>"));
        assert!(result.html.contains("<code>code</code>"));
    }

    #[test]
    fn test_all_block_kinds() {
        let document = "\
# Title

First line
second line.

> quoted
> text

- one
* two

1. first
2. second

---

```rust
let x = 1 < 2;
```";

        assert_eq!(
            render_plain(document).html,
            "\
<h1 id=\"title\">Title</h1>
<p>First line second line.</p>
<blockquote><p>quoted
text</p></blockquote>
<ul>
<li>one</li>
<li>two</li>
</ul>
<ol>
<li>first</li>
<li>second</li>
</ol>
<hr>
<pre><code class=\"language-rust\">let x = 1 &lt; 2;</code></pre>
"
        );
    }

    #[test]
    fn test_unclosed_code_block() {
        assert_eq!(
            render_plain("```\nline one\n# not heading").html,
            "<pre><code>line one\n# not heading</code></pre>\n"
        );
    }

    #[test]
    fn test_indented_fence_is_paragraph_text() {
        let html = render_plain("intro\n  ```\n  # x\n").html;

        assert!(html.starts_with("<p>intro "));
        assert!(!html.contains("<pre>"));
        assert!(!html.contains("<h1"));
    }

    #[test]
    fn test_fence_with_info_closes_open_block() {
        assert_eq!(
            render_plain("```\na\n```rust\nb\n```\nafter").html,
            "<pre><code>a</code></pre>\n<p>b</p>\n<pre><code>after</code></pre>\n"
        );
    }

    #[test]
    fn test_plain_text_is_escaped() {
        let result = render_plain("<script>alert('x')</script> & <b>\n\n# <i>title</i>");

        assert!(!result.html.contains("<script>"));
        assert!(!result.html.contains("<b>"));
        assert!(!result.html.contains("<i>"));
        assert!(result.html.contains("&lt;script&gt;"));
        assert!(result.html.contains("&amp;"));
    }

    #[test]
    fn test_escaping_holds_across_block_kinds() {
        let payloads = ["<img src=x>", "</p><script>", "<a href='x'>"];
        let wrappers = ["{}", "# {}", "> {}", "- {}", "1. {}", "```\n{}\n```", "**{}**"];

        for payload in payloads {
            for wrapper in wrappers {
                let document = wrapper.replace("{}", payload);
                let html = render_plain(&document).html;
                assert!(!html.contains(payload), "{document:?} rendered as {html:?}");
            }
        }
    }

    #[test]
    fn test_markdown_body_renders_before_hand_off() {
        let options = RenderOptions::new().with_shortcodes(&echo);
        let result = render(
            "{{< callout >}}\nInner **bold**\n{{< /callout >}}",
            &options,
        );

        assert_eq!(
            result.html,
            "<div data-name=\"callout\" data-inner-is-html=\"true\"><p>Inner <strong>bold</strong></p>\n</div>\n"
        );
    }

    #[test]
    fn test_raw_body_bypasses_markdown() {
        let options = RenderOptions::new().with_shortcodes(&echo);
        let result = render(
            "{{% code-tabs %}}\n*not markdown*\n{{% /code-tabs %}}",
            &options,
        );

        assert!(result.html.contains("*not markdown*"));
        assert!(!result.html.contains("<em>not markdown</em>"));
        assert!(result.html.contains("data-inner-is-html=\"false\""));
    }

    #[test]
    fn test_raw_body_expands_nested_shortcodes() {
        let options = RenderOptions::new().with_shortcodes(&echo);
        let result = render(
            "{{% outer %}}\n*raw* {{< inner >}}\n{{% /outer %}}",
            &options,
        );

        assert!(result.html.contains("*raw* <div data-name=\"inner\""));
    }

    #[test]
    fn test_mismatched_closer_warns_once() {
        let count = Cell::new(0);
        let sink = |_: &ShortcodeWarning| count.set(count.get() + 1);
        let options = RenderOptions::new()
            .with_shortcodes(&only_a)
            .with_warning_sink(&sink);

        let result = render("{{< a >}}body{{< /b >}}", &options);

        assert_eq!(count.get(), 1);
        assert_eq!(result.html, "<p><span>A</span>body{{&lt; /b &gt;}}</p>\n");
    }

    #[test]
    fn test_mismatch_inside_block_body_warns_once() {
        let warnings = RefCell::new(Vec::new());
        let sink = |w: &ShortcodeWarning| warnings.borrow_mut().push(w.to_string());
        let options = RenderOptions::new()
            .with_shortcodes(&echo)
            .with_warning_sink(&sink);

        let result = render("{{< box >}}\ntext {{< /other >}}\n{{< /box >}}", &options);

        assert!(result.html.contains("<p>text {{&lt; /other &gt;}}</p>"));

        assert_eq!(
            *warnings.borrow(),
            vec![r#"mismatched closing shortcode "other""#.to_owned()]
        );
    }

    #[test]
    fn test_fenced_shortcode_is_not_invoked() {
        let calls = Cell::new(0);
        let counting = |_: &ShortcodeCall<'_>, _: Option<&()>| {
            calls.set(calls.get() + 1);
            Ok::<_, ShortcodeError>("<b>x</b>".to_owned())
        };
        let options = RenderOptions::new().with_shortcodes(&counting);

        let result = render("```\n{{< x >}}\n```", &options);

        assert_eq!(calls.get(), 0);
        assert_eq!(result.html, "<pre><code>{{&lt; x &gt;}}</code></pre>\n");
    }

    #[test]
    fn test_inline_shortcode_in_paragraph() {
        let options = RenderOptions::new().with_shortcodes(&only_a);
        let result = render("Before {{< a >}} after", &options);

        assert_eq!(result.html, "<p>Before <span>A</span> after</p>\n");
    }

    #[test]
    fn test_standalone_inline_shortcode_is_not_wrapped() {
        let options = RenderOptions::new().with_shortcodes(&only_a);
        let result = render("text\n{{< a >}}\nmore", &options);

        assert_eq!(result.html, "<p>text</p>\n<span>A</span>\n<p>more</p>\n");
    }

    #[test]
    fn test_standalone_opener_without_closer_gets_empty_raw_body() {
        let options = RenderOptions::new().with_shortcodes(&echo);
        let result = render("{{< a >}}\ntext", &options);

        assert_eq!(
            result.html,
            "<div data-name=\"a\" data-inner-is-html=\"false\"></div>\n<p>text</p>\n"
        );
    }

    #[test]
    fn test_failed_shortcode_left_as_escaped_text() {
        let count = Cell::new(0);
        let sink = |_: &ShortcodeWarning| count.set(count.get() + 1);
        let options = RenderOptions::new()
            .with_shortcodes(&only_a)
            .with_warning_sink(&sink);

        let result = render(r#"x {{< missing k="v" >}} y"#, &options);

        assert_eq!(count.get(), 1);
        assert_eq!(
            result.html,
            "<p>x {{&lt; missing k=&quot;v&quot; &gt;}} y</p>\n"
        );
    }

    #[test]
    fn test_without_shortcode_renderer_tags_stay_text() {
        let count = Cell::new(0);
        let sink = |_: &ShortcodeWarning| count.set(count.get() + 1);
        let options = RenderOptions::<()>::new().with_warning_sink(&sink);

        let result = render("{{< a >}} {{< /b >}}", &options);

        assert_eq!(count.get(), 0);
        assert_eq!(result.html, "<p>{{&lt; a &gt;}} {{&lt; /b &gt;}}</p>\n");
    }

    #[test]
    fn test_shortcode_output_not_reparsed() {
        let raw = |_: &ShortcodeCall<'_>, _: Option<&()>| {
            Ok::<_, ShortcodeError>("<em>*keep*</em> # not heading".to_owned())
        };
        let options = RenderOptions::new().with_shortcodes(&raw);

        let result = render("{{< x >}}", &options);

        assert_eq!(result.html, "<em>*keep*</em> # not heading\n");
    }

    #[test]
    fn test_nested_markdown_body_skips_toc() {
        let options = RenderOptions::new().with_shortcodes(&echo);
        let result = render("# Outer\n{{< box >}}\n## Inner\n{{< /box >}}", &options);

        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].title, "Outer");
        assert!(result.html.contains("<h2 id=\"inner\">Inner</h2>"));
    }

    #[test]
    fn test_heading_with_shortcode_uses_plain_text() {
        let kbd = |_: &ShortcodeCall<'_>, _: Option<&()>| {
            Ok::<_, ShortcodeError>("<kbd>Ctrl</kbd>".to_owned())
        };
        let options = RenderOptions::new().with_shortcodes(&kbd);

        let result = render("## Press {{< kbd >}}", &options);

        assert_eq!(
            result.html,
            "<h2 id=\"press-ctrl\">Press <kbd>Ctrl</kbd></h2>\n"
        );
        assert_eq!(result.toc[0].title, "Press Ctrl");
    }

    #[test]
    fn test_depth_limit_reports_and_keeps_source() {
        let warnings = RefCell::new(Vec::new());
        let sink = |w: &ShortcodeWarning| warnings.borrow_mut().push(w.name().to_owned());
        let options = RenderOptions::new()
            .with_shortcodes(&echo)
            .with_max_shortcode_depth(2);

        let document = "{{< a >}}\n{{< b >}}\n{{< c >}}\ndeep\n{{< /c >}}\n{{< /b >}}\n{{< /a >}}";
        let result = render(document, &options.with_warning_sink(&sink));

        assert_eq!(*warnings.borrow(), vec!["c".to_owned()]);
        assert!(result.html.contains("data-name=\"a\""));
        assert!(result.html.contains("data-name=\"b\""));
        assert!(result.html.contains("{{&lt; c &gt;}}"));
    }

    #[test]
    fn test_deep_nesting_terminates() {
        let depth = 100;
        let mut document = String::new();
        for _ in 0..depth {
            document.push_str("{{< box >}}\n");
        }
        document.push_str("core\n");
        for _ in 0..depth {
            document.push_str("{{< /box >}}\n");
        }

        let count = Cell::new(0);
        let sink = |_: &ShortcodeWarning| count.set(count.get() + 1);
        let options = RenderOptions::new()
            .with_shortcodes(&echo)
            .with_warning_sink(&sink);

        let result = render(&document, &options);

        assert_eq!(count.get(), 1);
        assert!(result.html.starts_with("<div data-name=\"box\""));
    }

    #[test]
    fn test_summary_from_first_paragraph() {
        let result = render_plain("# Title\n\nFirst **para** &amp; more.\n\nSecond.");
        assert_eq!(result.summary, "First para &amp; more.");
    }

    #[test]
    fn test_summary_includes_shortcode_text() {
        let options = RenderOptions::new().with_shortcodes(&only_a);
        let result = render("Hello {{< a >}}!", &options);

        assert_eq!(result.summary, "Hello A!");
    }

    #[test]
    fn test_summary_truncated() {
        let long = "word ".repeat(100);
        let result = render_plain(&long);

        assert_eq!(result.summary.chars().count(), 200 + ELLIPSIS.len());
        assert!(result.summary.ends_with("..."));
    }

    #[test]
    fn test_summary_length_configurable() {
        let options = RenderOptions::<()>::new().with_config(&crate::RenderConfig {
            summary_length: 5,
            ..crate::RenderConfig::default()
        });
        assert_eq!(render("héllo wörld", &options).summary, "héllo...");
        assert_eq!(render("short", &options).summary, "short");
    }

    #[test]
    fn test_summary_empty_without_paragraph() {
        assert_eq!(render_plain("# Only heading\n- item").summary, "");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render_plain(""), RenderResult::default());
    }

    #[test]
    fn test_page_context_forwarded() {
        struct Page {
            slug: &'static str,
        }

        let with_page = |_: &ShortcodeCall<'_>, page: Option<&Page>| {
            Ok::<_, ShortcodeError>(page.map_or_else(String::new, |p| p.slug.to_owned()))
        };
        let page = Page { slug: "intro" };
        let options = RenderOptions::new()
            .with_shortcodes(&with_page)
            .with_page(&page)
            .with_source_path(Path::new("content/intro.md"));

        assert_eq!(
            render("at {{< here >}}", &options).html,
            "<p>at intro</p>\n"
        );
    }

    #[test]
    fn test_concurrent_renders_are_isolated() {
        let documents: Vec<String> = (0..8)
            .map(|i| format!("# Doc {i}\n\n{{{{< a >}}}} number {i}\n\n{{{{< /b >}}}}"))
            .collect();

        let sequential: Vec<RenderResult> = documents
            .iter()
            .map(|doc| render(doc, &RenderOptions::new().with_shortcodes(&only_a)))
            .collect();

        let concurrent: Vec<RenderResult> = std::thread::scope(|scope| {
            let handles: Vec<_> = documents
                .iter()
                .map(|doc| {
                    scope.spawn(move || render(doc, &RenderOptions::new().with_shortcodes(&only_a)))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(sequential, concurrent);
        assert!(concurrent[3].html.contains("number 3"));
    }

    #[test]
    fn test_truncate_summary() {
        assert_eq!(truncate_summary("abcdef", 3), "abc...");
        assert_eq!(truncate_summary("abc", 3), "abc");
        assert_eq!(truncate_summary("", 0), "");
    }
}
