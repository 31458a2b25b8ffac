//! Line-oriented markdown renderer with a shortcode macro layer.
//!
//! This crate converts markdown documents into HTML, a table of contents and
//! a plain-text summary. Shortcodes (`{{< name >}}` and `{{% name %}}`) are
//! rendered through a caller-supplied [`ShortcodeRenderer`] and their output
//! is inserted into the document without being escaped or reparsed.
//!
//! # Supported markdown
//!
//! Headings, paragraphs, fenced code blocks, blockquotes, unordered and
//! ordered lists, horizontal rules, and inline code, links, bold and italic.
//! Tables, footnotes, nested blockquotes and reference-style links are not
//! supported.
//!
//! # Example
//!
//! ```
//! use grove_markdown::{RenderOptions, ShortcodeCall, ShortcodeError, escape_html, render};
//!
//! let shortcodes = |call: &ShortcodeCall<'_>, _page: Option<&()>| match call.name {
//!     "note" => Ok(format!("<aside>{}</aside>", call.inner)),
//!     name => Err(ShortcodeError::NotFound { name: name.to_owned() }),
//! };
//!
//! let document = "# Guide\n\n{{< note >}}\nRead **this** first.\n{{< /note >}}";
//! let options = RenderOptions::new().with_shortcodes(&shortcodes);
//! let result = render(document, &options);
//!
//! assert_eq!(
//!     result.html,
//!     "<h1 id=\"guide\">Guide</h1>\n<aside><p>Read <strong>this</strong> first.</p>\n</aside>\n"
//! );
//! assert_eq!(result.toc.len(), 1);
//! ```

mod block;
mod error;
mod fence;
mod html;
mod inline;
mod options;
mod renderer;
pub mod shortcode;
mod toc;

pub use error::ShortcodeError;
pub use html::escape_html;
pub use inline::render_inline;
pub use options::{DEFAULT_MAX_SHORTCODE_DEPTH, DEFAULT_SUMMARY_LENGTH, RenderConfig, RenderOptions};
pub use renderer::{RenderResult, render};
pub use shortcode::{
    DelimiterKind, ShortcodeCall, ShortcodeRenderer, ShortcodeTag, ShortcodeWarning, is_standalone,
    parse_tag, strip_shortcodes,
};
pub use toc::{TocEntry, slugify};
