//! Render configuration and per-call options.

use std::path::Path;

use crate::{ShortcodeRenderer, ShortcodeWarning};

/// Default maximum nesting depth for block shortcodes.
pub const DEFAULT_MAX_SHORTCODE_DEPTH: usize = 16;

/// Default maximum summary length in characters (before the ellipsis).
pub const DEFAULT_SUMMARY_LENGTH: usize = 200;

/// Plain-data renderer settings.
///
/// With the `serde` feature this can be deserialized from a configuration
/// file; missing fields take their default values.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct RenderConfig {
    /// Do not collect table of contents entries.
    pub skip_toc: bool,
    /// Maximum nesting depth of block shortcodes.
    pub max_shortcode_depth: usize,
    /// Maximum summary length in characters.
    pub summary_length: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            skip_toc: false,
            max_shortcode_depth: DEFAULT_MAX_SHORTCODE_DEPTH,
            summary_length: DEFAULT_SUMMARY_LENGTH,
        }
    }
}

/// Options for a single [`render`](crate::render) call.
///
/// Options only borrow their collaborators and are `Copy`, so nested renders
/// can derive their own options cheaply. `P` is the opaque page context type
/// forwarded to the shortcode renderer.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use grove_markdown::{RenderConfig, RenderOptions};
///
/// let config = RenderConfig {
///     summary_length: 80,
///     ..RenderConfig::default()
/// };
/// let options: RenderOptions<'_> = RenderOptions::new()
///     .with_config(&config)
///     .with_source_path(Path::new("content/guide.md"));
///
/// assert_eq!(options.summary_length, 80);
/// assert!(options.shortcodes.is_none());
/// ```
pub struct RenderOptions<'a, P: ?Sized = ()> {
    /// Capability rendering shortcodes. Without it shortcode syntax is left as text.
    pub shortcodes: Option<&'a dyn ShortcodeRenderer<P>>,
    /// Page context forwarded to the shortcode renderer.
    pub page: Option<&'a P>,
    /// Path of the source document, used in warnings.
    pub source_path: Option<&'a Path>,
    /// Do not collect table of contents entries.
    pub skip_toc: bool,
    /// Maximum nesting depth of block shortcodes.
    pub max_shortcode_depth: usize,
    /// Maximum summary length in characters.
    pub summary_length: usize,
    /// Callback invoked for every warning, in addition to logging.
    pub on_warning: Option<&'a dyn Fn(&ShortcodeWarning)>,
}

impl<P: ?Sized> Clone for RenderOptions<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: ?Sized> Copy for RenderOptions<'_, P> {}

impl<P: ?Sized> Default for RenderOptions<'_, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, P: ?Sized> RenderOptions<'a, P> {
    /// Create options with default settings and no shortcode renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shortcodes: None,
            page: None,
            source_path: None,
            skip_toc: false,
            max_shortcode_depth: DEFAULT_MAX_SHORTCODE_DEPTH,
            summary_length: DEFAULT_SUMMARY_LENGTH,
            on_warning: None,
        }
    }

    /// Apply settings from a [`RenderConfig`].
    #[must_use]
    pub fn with_config(mut self, config: &RenderConfig) -> Self {
        self.skip_toc = config.skip_toc;
        self.max_shortcode_depth = config.max_shortcode_depth;
        self.summary_length = config.summary_length;
        self
    }

    /// Set the shortcode renderer.
    #[must_use]
    pub fn with_shortcodes(mut self, shortcodes: &'a dyn ShortcodeRenderer<P>) -> Self {
        self.shortcodes = Some(shortcodes);
        self
    }

    /// Set the page context.
    #[must_use]
    pub fn with_page(mut self, page: &'a P) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the source file path.
    #[must_use]
    pub fn with_source_path(mut self, source_path: &'a Path) -> Self {
        self.source_path = Some(source_path);
        self
    }

    /// Enable or disable table of contents collection.
    #[must_use]
    pub fn with_skip_toc(mut self, skip_toc: bool) -> Self {
        self.skip_toc = skip_toc;
        self
    }

    /// Set the maximum nesting depth of block shortcodes.
    #[must_use]
    pub fn with_max_shortcode_depth(mut self, depth: usize) -> Self {
        self.max_shortcode_depth = depth;
        self
    }

    /// Set the warning callback.
    #[must_use]
    pub fn with_warning_sink(mut self, sink: &'a dyn Fn(&ShortcodeWarning)) -> Self {
        self.on_warning = Some(sink);
        self
    }

    /// Log a warning and forward it to the warning sink.
    pub(crate) fn report(&self, warning: &ShortcodeWarning) {
        let source = self
            .source_path
            .map_or_else(|| "shortcode".to_owned(), |p| p.display().to_string());
        tracing::warn!(source = %source, shortcode = %warning.name(), "{warning}");
        if let Some(sink) = self.on_warning {
            sink(warning);
        }
    }
}
