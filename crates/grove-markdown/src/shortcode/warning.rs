//! Diagnostics recorded while expanding shortcodes.

use std::fmt;

use crate::ShortcodeError;

/// A non-fatal problem found while expanding shortcodes.
///
/// Warnings are logged through `tracing` and, if configured, passed to the
/// warning sink of [`RenderOptions`](crate::RenderOptions). They never change
/// the shape of the render result.
#[derive(Debug)]
pub enum ShortcodeWarning {
    /// A closing tag that does not close the innermost open shortcode.
    MismatchedClose {
        /// Name in the closing tag.
        name: String,
    },
    /// The render capability returned an error.
    RenderFailed {
        /// Shortcode name.
        name: String,
        /// Error returned by the capability.
        error: ShortcodeError,
    },
    /// Block shortcodes are nested deeper than the configured limit.
    DepthExceeded {
        /// Shortcode that was not expanded.
        name: String,
        /// Configured maximum depth.
        limit: usize,
    },
}

impl ShortcodeWarning {
    /// Name of the shortcode the warning is about.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::MismatchedClose { name }
            | Self::RenderFailed { name, .. }
            | Self::DepthExceeded { name, .. } => name,
        }
    }
}

impl fmt::Display for ShortcodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MismatchedClose { name } => write!(f, "mismatched closing shortcode {name:?}"),
            Self::RenderFailed { name, error } => {
                write!(f, "rendering shortcode {name:?} failed: {error}")
            }
            Self::DepthExceeded { name, limit } => write!(
                f,
                "shortcode {name:?} exceeds maximum nesting depth ({limit})"
            ),
        }
    }
}
