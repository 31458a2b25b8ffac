//! Code fence detection.
//!
//! Shared by the block renderer and the shortcode scanner so that both agree
//! on exactly which lines belong to a fenced code block.

use std::ops::Range;

const FENCE: &str = "```";

/// Detect an opening fence and return its (trimmed) info string.
///
/// The fence must start the line; indented backticks are ordinary text.
pub(crate) fn open_fence(line: &str) -> Option<&str> {
    line.strip_prefix(FENCE).map(str::trim)
}

/// Check if a line closes an open fence.
///
/// Any line starting with three backticks closes, whatever follows them.
pub(crate) fn closes_fence(line: &str) -> bool {
    line.starts_with(FENCE)
}

/// Tracks code fence state during line-by-line processing.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    in_fence: bool,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn in_fence(&self) -> bool {
        self.in_fence
    }

    /// Update fence state based on a line.
    ///
    /// Returns `true` if the line is a fence marker (opening or closing).
    pub(crate) fn update(&mut self, line: &str) -> bool {
        if self.in_fence {
            if closes_fence(line) {
                self.in_fence = false;
                return true;
            }
            false
        } else if open_fence(line).is_some() {
            self.in_fence = true;
            true
        } else {
            false
        }
    }
}

/// Byte ranges of `input` covered by fenced code blocks, fence lines included.
///
/// An unclosed fence extends to the end of input.
pub(crate) fn fenced_ranges(input: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut tracker = FenceTracker::new();
    let mut start = None;
    let mut offset = 0;

    for line in input.split_inclusive('\n') {
        let line_end = offset + line.len();
        let was_open = tracker.in_fence();
        if tracker.update(line) {
            if was_open {
                if let Some(begin) = start.take() {
                    ranges.push(begin..line_end);
                }
            } else {
                start = Some(offset);
            }
        }
        offset = line_end;
    }

    if let Some(begin) = start {
        ranges.push(begin..input.len());
    }

    ranges
}
