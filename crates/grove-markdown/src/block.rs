//! Line-oriented block scanning.
//!
//! [`BlockScanner`] walks the lines of a document front to back and groups
//! them into [`Block`]s. Every line belongs to exactly one block, so the line
//! counts of all yielded blocks add up to the input's line count.

use crate::fence::{closes_fence, open_fence};
use crate::shortcode::Placeholders;

/// Maximum heading level; deeper `#` runs are clamped.
const MAX_HEADING_LEVEL: usize = 6;

/// Classification of a run of lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BlockKind<'a> {
    /// `#`-prefixed heading.
    Heading { level: u8 },
    /// Run of text lines.
    Paragraph,
    /// Fenced code block.
    CodeBlock {
        language: Option<&'a str>,
        /// Whether the last line is the closing fence.
        closed: bool,
    },
    /// Run of `>`-prefixed lines.
    Blockquote,
    /// Run of `-`, `*` or `+` items.
    UnorderedList,
    /// Run of `1.` style items.
    OrderedList,
    /// Horizontal rule.
    Rule,
    /// Whitespace-only line.
    Blank,
    /// Line holding only a block shortcode placeholder.
    Placeholder,
}

/// A run of lines with its classification.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Block<'s, 'a> {
    pub(crate) kind: BlockKind<'a>,
    pub(crate) lines: &'s [&'a str],
}

/// Iterator over the blocks of a document.
pub(crate) struct BlockScanner<'s, 'a> {
    lines: &'s [&'a str],
    pos: usize,
    placeholders: &'s Placeholders,
}

impl<'s, 'a> BlockScanner<'s, 'a> {
    pub(crate) fn new(lines: &'s [&'a str], placeholders: &'s Placeholders) -> Self {
        Self {
            lines,
            pos: 0,
            placeholders,
        }
    }

    /// Classify the block starting at `lines[0]` and count the lines it takes.
    fn classify(&self, lines: &'s [&'a str]) -> (BlockKind<'a>, usize) {
        let line = lines[0];

        if self.placeholders.is_block_line(line) {
            return (BlockKind::Placeholder, 1);
        }

        if let Some(info) = open_fence(line) {
            let language = (!info.is_empty()).then_some(info);
            return match lines[1..].iter().position(|l| closes_fence(l)) {
                Some(idx) => (
                    BlockKind::CodeBlock {
                        language,
                        closed: true,
                    },
                    idx + 2,
                ),
                None => (
                    BlockKind::CodeBlock {
                        language,
                        closed: false,
                    },
                    lines.len(),
                ),
            };
        }

        if line.starts_with('#') {
            let level = line.chars().take_while(|&c| c == '#').count();
            let level = u8::try_from(level.min(MAX_HEADING_LEVEL)).unwrap_or(6);
            return (BlockKind::Heading { level }, 1);
        }

        if is_horizontal_rule(line) {
            return (BlockKind::Rule, 1);
        }

        if is_blockquote_line(line) {
            return (BlockKind::Blockquote, run_length(lines, is_blockquote_line));
        }

        if is_unordered_item(line) {
            return (BlockKind::UnorderedList, run_length(lines, is_unordered_item));
        }

        if is_ordered_item(line) {
            return (BlockKind::OrderedList, run_length(lines, is_ordered_item));
        }

        if line.trim().is_empty() {
            return (BlockKind::Blank, 1);
        }

        let len = 1 + lines[1..]
            .iter()
            .take_while(|l| !l.trim().is_empty() && !self.starts_block(l))
            .count();
        (BlockKind::Paragraph, len)
    }

    /// Whether `line` starts a non-paragraph block, ending a paragraph.
    fn starts_block(&self, line: &str) -> bool {
        self.placeholders.is_block_line(line)
            || open_fence(line).is_some()
            || line.starts_with('#')
            || is_horizontal_rule(line)
            || is_blockquote_line(line)
            || is_unordered_item(line)
            || is_ordered_item(line)
    }
}

impl<'s, 'a> Iterator for BlockScanner<'s, 'a> {
    type Item = Block<'s, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.lines.len() {
            return None;
        }

        let rest = &self.lines[self.pos..];
        let (kind, consumed) = self.classify(rest);
        self.pos += consumed;

        Some(Block {
            kind,
            lines: &rest[..consumed],
        })
    }
}

fn run_length(lines: &[&str], pred: fn(&str) -> bool) -> usize {
    lines.iter().take_while(|l| pred(l)).count()
}

/// `---`, `***`, `___`, optionally with spaces between the markers.
pub(crate) fn is_horizontal_rule(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.len() < 3 {
        return false;
    }
    let Some(marker) = trimmed.chars().next() else {
        return false;
    };
    matches!(marker, '-' | '*' | '_') && trimmed.chars().all(|c| c == marker || c == ' ')
}

pub(crate) fn is_blockquote_line(line: &str) -> bool {
    line.trim().starts_with('>')
}

pub(crate) fn is_unordered_item(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("+ ")
}

pub(crate) fn is_ordered_item(line: &str) -> bool {
    let trimmed = line.trim();
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && trimmed.as_bytes().get(digits) == Some(&b'.')
}
