//! Shortcode tag parsing.
//!
//! Parses `{{< name key="value" >}}` and `{{% name key="value" %}}` tags and
//! their closers `{{< /name >}}` / `{{% /name %}}`. Anything that deviates from
//! the grammar is not a tag; the caller then treats `{{` as literal text.

use std::collections::HashMap;
use std::ops::Range;

use crate::fence::fenced_ranges;

/// How the body of a block shortcode is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DelimiterKind {
    /// `{{< >}}`: the body is rendered as markdown before hand-off.
    MarkdownInner,
    /// `{{% %}}`: the body is passed through raw (nested shortcodes still expand).
    RawInner,
}

impl DelimiterKind {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'<' => Some(Self::MarkdownInner),
            b'%' => Some(Self::RawInner),
            _ => None,
        }
    }

    /// Closing sequence for this delimiter.
    fn closing(self) -> &'static str {
        match self {
            Self::MarkdownInner => ">}}",
            Self::RawInner => "%}}",
        }
    }
}

/// A parsed shortcode tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortcodeTag {
    /// Shortcode name.
    pub name: String,
    /// Parameters, empty for closing tags.
    pub params: HashMap<String, String>,
    /// Delimiter used by the tag.
    pub delimiter: DelimiterKind,
    /// Whether this is a closing tag (`{{< /name >}}`).
    pub is_closing: bool,
    /// Byte range of the tag in the source.
    pub span: Range<usize>,
}

impl ShortcodeTag {
    /// Original source text of the tag.
    #[must_use]
    pub fn source<'a>(&self, input: &'a str) -> &'a str {
        &input[self.span.clone()]
    }

    /// Whether `closer` closes a frame opened by `self`.
    pub(crate) fn is_closed_by(&self, closer: &ShortcodeTag) -> bool {
        closer.is_closing && closer.name == self.name && closer.delimiter == self.delimiter
    }
}

/// Parse a tag starting at byte offset `start` (which must point at `{{`).
///
/// Returns `None` on any syntax deviation.
#[must_use]
pub fn parse_tag(input: &str, start: usize) -> Option<ShortcodeTag> {
    let bytes = input.as_bytes();
    if !input.get(start..)?.starts_with("{{") {
        return None;
    }

    let delimiter = DelimiterKind::from_byte(*bytes.get(start + 2)?)?;
    let mut idx = skip_spaces(bytes, start + 3);

    let is_closing = bytes.get(idx) == Some(&b'/');
    if is_closing {
        idx = skip_spaces(bytes, idx + 1);
    }

    let (name, after_name) = parse_name(input, idx)?;
    idx = after_name;

    if is_closing {
        idx = skip_spaces(bytes, idx);
        let end = consume_closing(input, idx, delimiter)?;
        return Some(ShortcodeTag {
            name: name.to_owned(),
            params: HashMap::new(),
            delimiter,
            is_closing: true,
            span: start..end,
        });
    }

    let mut params = HashMap::new();
    loop {
        idx = skip_spaces(bytes, idx);
        if idx >= bytes.len() {
            return None;
        }
        if let Some(end) = consume_closing(input, idx, delimiter) {
            return Some(ShortcodeTag {
                name: name.to_owned(),
                params,
                delimiter,
                is_closing: false,
                span: start..end,
            });
        }

        let (key, after_key) = parse_name(input, idx)?;
        idx = skip_spaces(bytes, after_key);
        if bytes.get(idx) != Some(&b'=') {
            return None;
        }
        idx = skip_spaces(bytes, idx + 1);

        let quote = *bytes.get(idx)?;
        if quote != b'"' && quote != b'\'' {
            return None;
        }
        let value_start = idx + 1;
        let value_len = bytes.get(value_start..)?.iter().position(|&b| b == quote)?;
        let value_end = value_start + value_len;

        params.insert(key.to_owned(), input[value_start..value_end].to_owned());
        idx = value_end + 1;
    }
}

/// Whether the tag at `span` is the only non-whitespace content on its line.
#[must_use]
pub fn is_standalone(input: &str, span: &Range<usize>) -> bool {
    let line_start = input[..span.start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = input[span.end..]
        .find('\n')
        .map_or(input.len(), |i| span.end + i);

    input[line_start..span.start].trim().is_empty() && input[span.end..line_end].trim().is_empty()
}

/// The closer found for a block opener.
#[derive(Debug)]
pub(crate) struct Closer {
    /// The matching closing tag.
    pub(crate) tag: ShortcodeTag,
    /// Closing tags inside the body that matched no open frame.
    pub(crate) mismatched: Vec<ShortcodeTag>,
}

/// Iterates over parsed tags in a source, skipping fenced code.
///
/// Unparseable `{{` occurrences are skipped. The scanner can be repositioned
/// with [`seek`](Self::seek) to resume after a consumed region.
pub(crate) struct TagScanner<'a> {
    input: &'a str,
    fences: Vec<Range<usize>>,
    pos: usize,
}

impl<'a> TagScanner<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            fences: fenced_ranges(input),
            pos: 0,
        }
    }

    /// Move the scan position.
    pub(crate) fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Find the next `{{` outside fenced code, starting at the current position.
    ///
    /// Does not advance past the returned offset.
    pub(crate) fn next_open(&mut self) -> Option<usize> {
        loop {
            let found = self.pos + self.input.get(self.pos..)?.find("{{")?;
            match self.fences.iter().find(|r| r.contains(&found)) {
                Some(fence) => self.pos = fence.end,
                None => return Some(found),
            }
        }
    }

    /// Find the closer matching a standalone `opener`.
    ///
    /// Scans from the end of `opener` with a nesting stack: standalone openers
    /// push a frame, and a closer pops only when it matches the innermost
    /// frame's name and delimiter. Any other closer is recorded as mismatched.
    /// The scan position is left unchanged.
    pub(crate) fn find_closer(&mut self, opener: &ShortcodeTag) -> Option<Closer> {
        let saved = self.pos;
        self.pos = opener.span.end;
        let found = self.match_closer(opener);
        self.pos = saved;
        found
    }

    fn match_closer(&mut self, opener: &ShortcodeTag) -> Option<Closer> {
        let mut stack = vec![opener.clone()];
        let mut mismatched = Vec::new();

        while let Some(tag) = self.next_tag() {
            if !tag.is_closing {
                if is_standalone(self.input, &tag.span) {
                    stack.push(tag);
                }
                continue;
            }

            let top = stack.last()?;
            if !top.is_closed_by(&tag) {
                mismatched.push(tag);
                continue;
            }
            stack.pop();
            if stack.is_empty() {
                return Some(Closer { tag, mismatched });
            }
        }

        None
    }

    /// Find the next well-formed tag, advancing past it.
    pub(crate) fn next_tag(&mut self) -> Option<ShortcodeTag> {
        loop {
            let open = self.next_open()?;
            if let Some(tag) = parse_tag(self.input, open) {
                self.pos = tag.span.end;
                return Some(tag);
            }
            self.pos = open + 2;
        }
    }
}

fn skip_spaces(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && matches!(bytes[idx], b' ' | b'\t' | b'\n' | b'\r') {
        idx += 1;
    }
    idx
}

/// Parse `[A-Za-z][A-Za-z0-9_-]*` at `idx`.
fn parse_name(input: &str, idx: usize) -> Option<(&str, usize)> {
    let bytes = input.as_bytes();
    if !bytes.get(idx)?.is_ascii_alphabetic() {
        return None;
    }
    let len = bytes[idx..]
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        .count();
    Some((&input[idx..idx + len], idx + len))
}

fn consume_closing(input: &str, idx: usize, delimiter: DelimiterKind) -> Option<usize> {
    let closing = delimiter.closing();
    input
        .get(idx..)?
        .starts_with(closing)
        .then_some(idx + closing.len())
}
