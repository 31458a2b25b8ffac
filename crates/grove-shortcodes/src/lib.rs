//! Shortcode registry and built-in shortcodes for `grove-markdown`.
//!
//! [`ShortcodeRegistry`] maps shortcode names to [`Shortcode`] handlers and
//! implements [`grove_markdown::ShortcodeRenderer`], so it plugs straight
//! into [`RenderOptions::with_shortcodes`](grove_markdown::RenderOptions::with_shortcodes).
//!
//! # Example
//!
//! ```
//! use grove_markdown::{RenderOptions, render};
//! use grove_shortcodes::ShortcodeRegistry;
//!
//! let registry = ShortcodeRegistry::<()>::new().with_builtins();
//! let options = RenderOptions::new().with_shortcodes(&registry);
//!
//! let result = render(
//!     "{{< callout type=\"tip\" >}}\nUse `cargo doc`.\n{{< /callout >}}",
//!     &options,
//! );
//! assert!(result.html.contains("shortcode-callout-tip"));
//! assert!(result.html.contains("<code>cargo doc</code>"));
//! ```

mod builtin;
mod registry;

pub use builtin::{Callout, CodeTabs, Figure, Section, YouTube};
pub use registry::{Shortcode, ShortcodeRegistry};
