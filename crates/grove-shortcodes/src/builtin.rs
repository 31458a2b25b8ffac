//! Built-in shortcodes.
//!
//! Parameter values are always HTML-escaped. Bodies of `{{< >}}` blocks are
//! already rendered HTML and are inserted as-is; raw `{{% %}}` bodies are
//! escaped, except for `code-tabs`, which exists to pass markup through.

use std::borrow::Cow;

use grove_markdown::{ShortcodeCall, ShortcodeError, escape_html};

use crate::Shortcode;

/// Body of a call as HTML.
fn inner_html<'a>(call: &ShortcodeCall<'a>) -> Cow<'a, str> {
    if call.inner_is_html {
        Cow::Borrowed(call.inner)
    } else {
        Cow::Owned(escape_html(call.inner))
    }
}

/// Escaped parameter value, if present and non-empty.
fn param_html(call: &ShortcodeCall<'_>, key: &str) -> Option<String> {
    call.param(key)
        .filter(|value| !value.is_empty())
        .map(escape_html)
}

/// Highlighted note box: `{{< callout type="warning" title="Heads up" >}}`.
pub struct Callout;

impl<P: ?Sized> Shortcode<P> for Callout {
    fn name(&self) -> &str {
        "callout"
    }

    fn render(
        &self,
        call: &ShortcodeCall<'_>,
        _page: Option<&P>,
    ) -> Result<String, ShortcodeError> {
        let modifier = param_html(call, "type")
            .map(|kind| format!(" shortcode-callout-{kind}"))
            .unwrap_or_default();
        let title = param_html(call, "title")
            .map(|title| format!("<strong class=\"shortcode-callout-title\">{title}</strong>\n"))
            .unwrap_or_default();

        Ok(format!(
            "<div class=\"shortcode-callout{modifier}\">\n{title}\
             <div class=\"shortcode-callout-body\">{}</div>\n</div>",
            inner_html(call)
        ))
    }
}

/// Image with optional caption: `{{< figure src="/a.png" alt="..." caption="..." >}}`.
pub struct Figure;

impl<P: ?Sized> Shortcode<P> for Figure {
    fn name(&self) -> &str {
        "figure"
    }

    fn render(
        &self,
        call: &ShortcodeCall<'_>,
        _page: Option<&P>,
    ) -> Result<String, ShortcodeError> {
        let src = escape_html(call.require("src")?);
        let alt = escape_html(call.param("alt").unwrap_or_default());

        let caption = param_html(call, "caption")
            .map(|caption| format!("<figcaption>{caption}</figcaption>\n"))
            .unwrap_or_default();

        Ok(format!(
            "<figure class=\"shortcode-figure\">\n<img src=\"{src}\" alt=\"{alt}\">\n{caption}</figure>"
        ))
    }
}

const YOUTUBE_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

/// Embedded video: `{{< youtube id="dQw4w9WgXcQ" >}}`.
pub struct YouTube;

impl<P: ?Sized> Shortcode<P> for YouTube {
    fn name(&self) -> &str {
        "youtube"
    }

    fn render(
        &self,
        call: &ShortcodeCall<'_>,
        _page: Option<&P>,
    ) -> Result<String, ShortcodeError> {
        let id = call.require("id")?;
        if id.trim().is_empty() {
            return Err(ShortcodeError::failed(call.name, "empty video id"));
        }
        let id = escape_html(id);
        let title = param_html(call, "title").unwrap_or_else(|| "YouTube video".to_owned());

        Ok(format!(
            "<div class=\"shortcode-youtube\">\n<iframe src=\"https://www.youtube.com/embed/{id}\" \
             title=\"{title}\" loading=\"lazy\" allow=\"{YOUTUBE_ALLOW}\" allowfullscreen></iframe>\n</div>"
        ))
    }
}

/// Titled section wrapping its body, e.g. `key-takeaways` and `prereqs`.
pub struct Section {
    name: &'static str,
    heading: &'static str,
}

impl Section {
    /// `{{< key-takeaways >}}` section.
    #[must_use]
    pub fn key_takeaways() -> Self {
        Self {
            name: "key-takeaways",
            heading: "Key takeaways",
        }
    }

    /// `{{< prereqs >}}` section.
    #[must_use]
    pub fn prereqs() -> Self {
        Self {
            name: "prereqs",
            heading: "Prerequisites",
        }
    }
}

impl<P: ?Sized> Shortcode<P> for Section {
    fn name(&self) -> &str {
        self.name
    }

    fn render(
        &self,
        call: &ShortcodeCall<'_>,
        _page: Option<&P>,
    ) -> Result<String, ShortcodeError> {
        Ok(format!(
            "<section class=\"shortcode-{name}\">\n<h3>{heading}</h3>\n\
             <div class=\"shortcode-{name}-body\">{body}</div>\n</section>",
            name = self.name,
            heading = self.heading,
            body = inner_html(call),
        ))
    }
}

/// Tabbed code container. The body is trusted and inserted verbatim.
pub struct CodeTabs;

impl<P: ?Sized> Shortcode<P> for CodeTabs {
    fn name(&self) -> &str {
        "code-tabs"
    }

    fn render(
        &self,
        call: &ShortcodeCall<'_>,
        _page: Option<&P>,
    ) -> Result<String, ShortcodeError> {
        Ok(format!(
            "<div class=\"shortcode-code-tabs\">\n{}\n</div>",
            call.inner.trim()
        ))
    }
}
