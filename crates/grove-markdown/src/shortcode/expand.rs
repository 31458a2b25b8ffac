//! Shortcode expansion.
//!
//! Replaces shortcode tags in a source document with placeholder tokens and
//! records the HTML each shortcode produced. Block shortcodes (a standalone
//! opener with a matching closer) have their body handled according to the
//! opener's delimiter before the capability is called:
//!
//! - `{{< >}}`: the body is rendered as markdown through the full pipeline.
//! - `{{% %}}`: only shortcodes nested in the body are expanded.

use crate::renderer::render_at_depth;
use crate::{RenderOptions, ShortcodeRenderer, ShortcodeWarning};

use super::capability::ShortcodeCall;
use super::placeholder::Placeholders;
use super::tag::{Closer, DelimiterKind, ShortcodeTag, TagScanner, is_standalone};

/// Expansion state for one nesting level of a render call.
pub(crate) struct Expander<'r, 'o, P: ?Sized> {
    options: &'r RenderOptions<'o, P>,
    shortcodes: &'o dyn ShortcodeRenderer<P>,
    depth: usize,
    expanded: usize,
}

impl<'r, 'o, P: ?Sized> Expander<'r, 'o, P> {
    pub(crate) fn new(
        options: &'r RenderOptions<'o, P>,
        shortcodes: &'o dyn ShortcodeRenderer<P>,
        depth: usize,
    ) -> Self {
        Self {
            options,
            shortcodes,
            depth,
            expanded: 0,
        }
    }

    /// Number of shortcodes successfully rendered so far.
    pub(crate) fn expanded(&self) -> usize {
        self.expanded
    }

    /// Expand all shortcodes in `input`, storing their output in `placeholders`.
    pub(crate) fn expand(&mut self, input: &str, placeholders: &mut Placeholders) -> String {
        let mut output = String::with_capacity(input.len());
        let mut scanner = TagScanner::new(input);
        let mut copied = 0;

        while let Some(tag) = scanner.next_tag() {
            output.push_str(&input[copied..tag.span.start]);
            copied = tag.span.end;

            if tag.is_closing {
                self.options
                    .report(&ShortcodeWarning::MismatchedClose { name: tag.name });
                output.push_str(&input[tag.span.clone()]);
                continue;
            }

            let standalone = is_standalone(input, &tag.span);
            if standalone && let Some(closer) = scanner.find_closer(&tag) {
                let end = closer.tag.span.end;
                let replacement = self.expand_block(input, &tag, closer, placeholders);
                output.push_str(&replacement);
                copied = end;
                scanner.seek(end);
                continue;
            }

            match self.call(&tag, "", false) {
                Some(html) => output.push_str(&placeholders.insert(html, standalone)),
                None => output.push_str(tag.source(input)),
            }
        }

        output.push_str(&input[copied..]);
        output
    }

    /// Expand a block shortcode, returning its token or its literal source.
    fn expand_block(
        &mut self,
        input: &str,
        tag: &ShortcodeTag,
        closer: Closer,
        placeholders: &mut Placeholders,
    ) -> String {
        let source = &input[tag.span.start..closer.tag.span.end];
        let body = &input[tag.span.end..closer.tag.span.start];

        if self.depth >= self.options.max_shortcode_depth {
            self.options.report(&ShortcodeWarning::DepthExceeded {
                name: tag.name.clone(),
                limit: self.options.max_shortcode_depth,
            });
            // The body is emitted as text and never rescanned, so report its
            // stray closers here.
            for stray in closer.mismatched {
                self.options
                    .report(&ShortcodeWarning::MismatchedClose { name: stray.name });
            }
            return source.to_owned();
        }

        let (inner, inner_is_html) = match tag.delimiter {
            DelimiterKind::MarkdownInner => (self.render_markdown_body(body), true),
            DelimiterKind::RawInner => (self.expand_raw_body(body), false),
        };

        match self.call(tag, &inner, inner_is_html) {
            Some(html) => placeholders.insert(html, true),
            None => source.to_owned(),
        }
    }

    /// Render a `{{< >}}` body as markdown, without collecting TOC entries.
    fn render_markdown_body(&self, body: &str) -> String {
        let nested = RenderOptions {
            skip_toc: true,
            ..*self.options
        };
        render_at_depth(body, &nested, self.depth + 1).html
    }

    /// Expand shortcodes nested in a `{{% %}}` body, leaving the rest raw.
    fn expand_raw_body(&self, body: &str) -> String {
        let mut placeholders = Placeholders::for_source(body);
        let mut nested = Expander::new(self.options, self.shortcodes, self.depth + 1);
        let expanded = nested.expand(body, &mut placeholders);
        placeholders.substitute(&expanded)
    }

    fn call(&mut self, tag: &ShortcodeTag, inner: &str, inner_is_html: bool) -> Option<String> {
        let call = ShortcodeCall {
            name: &tag.name,
            params: &tag.params,
            inner,
            inner_is_html,
        };

        match self.shortcodes.render(&call, self.options.page) {
            Ok(html) => {
                self.expanded += 1;
                Some(html)
            }
            Err(error) => {
                self.options.report(&ShortcodeWarning::RenderFailed {
                    name: tag.name.clone(),
                    error,
                });
                None
            }
        }
    }
}
