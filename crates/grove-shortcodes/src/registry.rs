//! Name-based shortcode dispatch.

use std::collections::HashMap;

use grove_markdown::{ShortcodeCall, ShortcodeError, ShortcodeRenderer};

use crate::builtin::{Callout, CodeTabs, Figure, Section, YouTube};

/// A named shortcode handler.
///
/// `P` is the page context type handed through from the render options.
pub trait Shortcode<P: ?Sized = ()> {
    /// Name used in tags, e.g. `"callout"` for `{{< callout >}}`.
    fn name(&self) -> &str;

    /// Render one invocation to HTML.
    fn render(&self, call: &ShortcodeCall<'_>, page: Option<&P>) -> Result<String, ShortcodeError>;
}

/// Adapter registering a closure under a name.
struct FnShortcode<F> {
    name: String,
    render: F,
}

impl<P: ?Sized, F> Shortcode<P> for FnShortcode<F>
where
    F: Fn(&ShortcodeCall<'_>, Option<&P>) -> Result<String, ShortcodeError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, call: &ShortcodeCall<'_>, page: Option<&P>) -> Result<String, ShortcodeError> {
        (self.render)(call, page)
    }
}

/// Collection of shortcode handlers keyed by name.
///
/// Implements [`ShortcodeRenderer`], so a registry can be passed directly to
/// [`RenderOptions::with_shortcodes`](grove_markdown::RenderOptions::with_shortcodes).
/// Registering a handler under an existing name replaces the previous one.
///
/// # Example
///
/// ```
/// use grove_markdown::{RenderOptions, ShortcodeError, escape_html, render};
/// use grove_shortcodes::ShortcodeRegistry;
///
/// let registry = ShortcodeRegistry::new().with_fn("kbd", |call, _page: Option<&()>| {
///     Ok::<_, ShortcodeError>(format!("<kbd>{}</kbd>", escape_html(call.require("key")?)))
/// });
///
/// let options = RenderOptions::new().with_shortcodes(&registry);
/// let result = render(r#"Press {{< kbd key="Esc" >}}."#, &options);
/// assert_eq!(result.html, "<p>Press <kbd>Esc</kbd>.</p>\n");
/// ```
pub struct ShortcodeRegistry<P: ?Sized = ()> {
    handlers: HashMap<String, Box<dyn Shortcode<P>>>,
}

impl<P: ?Sized> Default for ShortcodeRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> ShortcodeRegistry<P> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a shortcode handler.
    #[must_use]
    pub fn with<S>(mut self, shortcode: S) -> Self
    where
        S: Shortcode<P> + 'static,
    {
        self.register(shortcode);
        self
    }

    /// Register a closure as a shortcode handler.
    #[must_use]
    pub fn with_fn<F>(self, name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&ShortcodeCall<'_>, Option<&P>) -> Result<String, ShortcodeError> + 'static,
    {
        self.with(FnShortcode {
            name: name.into(),
            render,
        })
    }

    /// Register the built-in shortcodes.
    ///
    /// `callout`, `figure`, `youtube`, `key-takeaways`, `prereqs` and
    /// `code-tabs`. Handlers registered afterwards under the same names
    /// replace the built-ins.
    #[must_use]
    pub fn with_builtins(self) -> Self {
        self.with(Callout)
            .with(Figure)
            .with(YouTube)
            .with(Section::key_takeaways())
            .with(Section::prereqs())
            .with(CodeTabs)
    }

    /// Register a shortcode handler in place.
    pub fn register<S>(&mut self, shortcode: S)
    where
        S: Shortcode<P> + 'static,
    {
        let name = shortcode.name().to_owned();
        if self.handlers.insert(name.clone(), Box::new(shortcode)).is_some() {
            tracing::debug!(name = %name, "Replaced shortcode handler");
        }
    }

    /// Check whether a shortcode is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered shortcode names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered shortcodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<P: ?Sized> ShortcodeRenderer<P> for ShortcodeRegistry<P> {
    fn render(&self, call: &ShortcodeCall<'_>, page: Option<&P>) -> Result<String, ShortcodeError> {
        let Some(handler) = self.handlers.get(call.name) else {
            return Err(ShortcodeError::NotFound {
                name: call.name.to_owned(),
            });
        };
        tracing::debug!(
            name = %call.name,
            inner_is_html = call.inner_is_html,
            "Rendering shortcode"
        );
        handler.render(call, page)
    }
}
