//! Errors returned by shortcode render capabilities.

/// Error returned when a shortcode cannot be rendered.
///
/// The renderer never propagates this error: it logs a warning and keeps the
/// shortcode's source text in the output instead.
#[derive(Debug, thiserror::Error)]
pub enum ShortcodeError {
    /// No shortcode with this name is defined.
    #[error("Shortcode {name:?} not found")]
    NotFound {
        /// Shortcode name.
        name: String,
    },
    /// A required parameter was not supplied.
    #[error("Shortcode {name:?} requires parameter {param:?}")]
    MissingParam {
        /// Shortcode name.
        name: String,
        /// Missing parameter key.
        param: String,
    },
    /// The shortcode failed for another reason.
    #[error("Shortcode {name:?} failed: {message}")]
    Failed {
        /// Shortcode name.
        name: String,
        /// Human-readable reason.
        message: String,
    },
}

impl ShortcodeError {
    /// Create a [`ShortcodeError::Failed`] error.
    #[must_use]
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ShortcodeError::NotFound {
            name: "callout".to_owned(),
        };
        assert_eq!(err.to_string(), r#"Shortcode "callout" not found"#);

        let err = ShortcodeError::MissingParam {
            name: "figure".to_owned(),
            param: "src".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            r#"Shortcode "figure" requires parameter "src""#
        );

        let err = ShortcodeError::failed("x", "boom");
        assert_eq!(err.to_string(), r#"Shortcode "x" failed: boom"#);
    }
}
