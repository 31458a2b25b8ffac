//! Shortcode macro layer.
//!
//! Shortcodes are template calls embedded in markdown:
//!
//! - `{{< name key="value" >}}` ... `{{< /name >}}`: the body is rendered as
//!   markdown and handed to the renderer as HTML.
//! - `{{% name key="value" %}}` ... `{{% /name %}}`: the body is handed over
//!   raw. Shortcodes nested in it are still expanded.
//!
//! A tag that is alone on its line and has a matching closer forms a block
//! shortcode. Every other tag is rendered inline with an empty body.
//!
//! # Architecture
//!
//! Expansion runs before block rendering and replaces each rendered shortcode
//! with a placeholder token. After the block renderer has produced HTML, the
//! tokens are substituted in a single pass, so shortcode output is never
//! escaped or reinterpreted as markdown. Tags inside fenced code are never
//! expanded.

mod capability;
mod expand;
mod placeholder;
mod strip;
mod tag;
mod warning;

pub use capability::{ShortcodeCall, ShortcodeRenderer};
pub use strip::strip_shortcodes;
pub use tag::{DelimiterKind, ShortcodeTag, is_standalone, parse_tag};
pub use warning::ShortcodeWarning;

pub(crate) use expand::Expander;
pub(crate) use placeholder::Placeholders;
