//! The shortcode render capability.

use std::collections::HashMap;

use crate::ShortcodeError;

/// A single shortcode invocation handed to a [`ShortcodeRenderer`].
#[derive(Clone, Copy, Debug)]
pub struct ShortcodeCall<'a> {
    /// Shortcode name.
    pub name: &'a str,
    /// Parameters from the opening tag.
    pub params: &'a HashMap<String, String>,
    /// Inner content (empty for inline shortcodes).
    pub inner: &'a str,
    /// Whether `inner` is rendered HTML (`{{< >}}` blocks) or raw text (`{{% %}}` blocks).
    pub inner_is_html: bool,
}

impl<'a> ShortcodeCall<'a> {
    /// Get a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&'a str> {
        self.params.get(key).map(String::as_str)
    }

    /// Get a parameter value, failing with [`ShortcodeError::MissingParam`] if absent.
    pub fn require(&self, key: &str) -> Result<&'a str, ShortcodeError> {
        self.param(key).ok_or_else(|| ShortcodeError::MissingParam {
            name: self.name.to_owned(),
            param: key.to_owned(),
        })
    }
}

/// Renders a named shortcode to an HTML fragment.
///
/// `P` is the page context type. The renderer forwards it unchanged and never
/// inspects it.
///
/// Implementations must be re-entrant: block shortcodes with markdown bodies
/// are rendered recursively, so `render` may be called again for nested
/// shortcodes before the outer call is made.
///
/// Closures with the matching signature implement this trait.
///
/// # Example
///
/// ```
/// use grove_markdown::{RenderOptions, ShortcodeCall, ShortcodeError, render};
///
/// let shortcodes = |call: &ShortcodeCall<'_>, _page: Option<&()>| {
///     Ok::<_, ShortcodeError>(format!("<kbd>{}</kbd>", call.require("key")?))
/// };
///
/// let options = RenderOptions::new().with_shortcodes(&shortcodes);
/// let result = render(r#"Press {{< kbd key="Ctrl" >}} now."#, &options);
/// assert_eq!(result.html, "<p>Press <kbd>Ctrl</kbd> now.</p>\n");
/// ```
pub trait ShortcodeRenderer<P: ?Sized = ()> {
    /// Render a shortcode invocation.
    fn render(&self, call: &ShortcodeCall<'_>, page: Option<&P>) -> Result<String, ShortcodeError>;
}

impl<P: ?Sized, F> ShortcodeRenderer<P> for F
where
    F: Fn(&ShortcodeCall<'_>, Option<&P>) -> Result<String, ShortcodeError>,
{
    fn render(&self, call: &ShortcodeCall<'_>, page: Option<&P>) -> Result<String, ShortcodeError> {
        self(call, page)
    }
}
