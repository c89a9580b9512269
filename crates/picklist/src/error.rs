//! Error types for the select widget.

/// Result type alias for select operations.
pub type Result<T> = std::result::Result<T, SelectError>;

/// Errors that can occur while building or driving a select widget.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// No host element was supplied.
    #[error("a host element is required to build a select")]
    MissingElement,

    /// The host element is neither a choice control nor a text input.
    #[error("element type should be select or input, got: {tag_name}")]
    UnsupportedElement { tag_name: String },

    /// Configuration overrides could not be parsed.
    #[error("invalid select configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// A multi-select backing value is not a JSON array of scalars.
    #[error("malformed backing value '{raw}': {message}")]
    MalformedValue { raw: String, message: String },
}

impl SelectError {
    /// Create an unsupported element error.
    pub fn unsupported_element(tag_name: impl Into<String>) -> Self {
        Self::UnsupportedElement {
            tag_name: tag_name.into(),
        }
    }

    /// Create a malformed value error.
    pub fn malformed_value(raw: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedValue {
            raw: raw.into(),
            message: message.into(),
        }
    }
}
