//! Placeholder tokens standing in for expanded shortcode HTML.
//!
//! Expansion replaces each shortcode with an opaque token and records the
//! produced HTML in a [`Placeholders`] table. The block renderer treats tokens
//! as ordinary text (or, for block tokens on their own line, as a block of
//! their own), and [`Placeholders::substitute`] swaps the HTML back in at the
//! very end, so shortcode output is never escaped or parsed as markdown.
//!
//! # Token format
//!
//! A token is `S<n>S`: a decimal counter between two copies of a sigil
//! character `S`. The sigil is the first Unicode private-use code point
//! (`U+E000..=U+F8FF`) that does not occur in the source being expanded, so a
//! token can never be confused with text the author wrote. Private-use
//! characters are untouched by HTML escaping and inline formatting.

use crate::html::to_plain_text;

const SIGIL_RANGE: std::ops::RangeInclusive<u32> = 0xE000..=0xF8FF;

/// A single stored fragment.
#[derive(Debug)]
struct Placeholder {
    html: String,
    block: bool,
}

/// Token to fragment mapping for one render call.
#[derive(Debug)]
pub(crate) struct Placeholders {
    sigil: char,
    entries: Vec<Placeholder>,
}

impl Placeholders {
    /// Create a table whose tokens cannot occur in `source`.
    pub(crate) fn for_source(source: &str) -> Self {
        let sigil = SIGIL_RANGE
            .filter_map(char::from_u32)
            .find(|c| !source.contains(*c))
            .unwrap_or('\u{E000}');
        Self {
            sigil,
            entries: Vec::new(),
        }
    }

    /// Store a fragment and return its token.
    pub(crate) fn insert(&mut self, html: String, block: bool) -> String {
        let id = self.entries.len();
        self.entries.push(Placeholder { html, block });
        self.token(id)
    }

    fn token(&self, id: usize) -> String {
        format!("{sigil}{id}{sigil}", sigil = self.sigil)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `line`, ignoring surrounding whitespace, is exactly a block token.
    pub(crate) fn is_block_line(&self, line: &str) -> bool {
        let trimmed = line.trim();
        match self.parse_token(trimmed) {
            Some((id, len)) if len == trimmed.len() => self.entries[id].block,
            _ => false,
        }
    }

    /// Parse a token at the start of `s`, returning its id and byte length.
    fn parse_token(&self, s: &str) -> Option<(usize, usize)> {
        let rest = s.strip_prefix(self.sigil)?;
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let after = rest[digits..].strip_prefix(self.sigil)?;
        let id: usize = rest[..digits].parse().ok()?;
        if id >= self.entries.len() {
            return None;
        }
        Some((id, s.len() - after.len()))
    }

    /// Replace every token in `text` with its stored HTML.
    ///
    /// Runs as a single left-to-right pass, so substituted HTML is never
    /// scanned for tokens again.
    pub(crate) fn substitute(&self, text: &str) -> String {
        self.replace_tokens(text, |entry| entry.html.as_str())
    }

    /// Replace every token with the plain text of its fragment.
    ///
    /// Used for derived text such as TOC titles.
    pub(crate) fn substitute_plain(&self, text: &str) -> String {
        if self.is_empty() || !text.contains(self.sigil) {
            return text.to_owned();
        }
        let plain: Vec<String> = self.entries.iter().map(|e| to_plain_text(&e.html)).collect();
        let mut out = String::with_capacity(text.len());
        self.walk(text, &mut out, |id| plain[id].as_str());
        out
    }

    fn replace_tokens<'s>(
        &'s self,
        text: &str,
        fragment: impl Fn(&'s Placeholder) -> &'s str,
    ) -> String {
        if self.is_empty() || !text.contains(self.sigil) {
            return text.to_owned();
        }
        let mut out = String::with_capacity(text.len());
        let replaced = self.walk(text, &mut out, |id| fragment(&self.entries[id]));
        if replaced != self.entries.len() {
            tracing::debug!(
                expected = self.entries.len(),
                replaced,
                "Placeholder count mismatch during substitution"
            );
        }
        out
    }

    /// Copy `text` into `out`, replacing tokens. Returns the number replaced.
    fn walk<'f>(
        &self,
        text: &str,
        out: &mut String,
        fragment: impl Fn(usize) -> &'f str,
    ) -> usize {
        let mut replaced = 0;
        let mut rest = text;

        while let Some(pos) = rest.find(self.sigil) {
            out.push_str(&rest[..pos]);
            let candidate = &rest[pos..];
            if let Some((id, len)) = self.parse_token(candidate) {
                out.push_str(fragment(id));
                replaced += 1;
                rest = &candidate[len..];
            } else {
                out.push(self.sigil);
                rest = &candidate[self.sigil.len_utf8()..];
            }
        }
        out.push_str(rest);

        replaced
    }
}
