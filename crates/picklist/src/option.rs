//! Option types.
//!
//! [`RawOption`] is what callers hand in (from a native `<select>`, a config
//! file or a data source); [`SelectOption`] is the normalized form the
//! [`OptionStore`](crate::OptionStore) keeps.

use serde::{Deserialize, Deserializer, Serialize};

/// A normalized option held by the option store.
///
/// `value` is the canonical machine value and `text` the display label.
/// Values always compare as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
    pub selected: bool,
}

impl SelectOption {
    /// Create an unselected option.
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            selected: false,
        }
    }

    /// Set the selection flag using builder pattern.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Compare this option's value with the string form of another value.
    pub fn has_value(&self, value: &str) -> bool {
        self.value == value
    }
}

/// An option as supplied by the caller.
///
/// `value` is optional; when it is missing or empty the option's `text` is
/// used instead. Numeric and boolean JSON values are accepted and kept in
/// their string form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RawOption {
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub value: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub selected: bool,
}

impl RawOption {
    /// Create an option with only a label.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            value: None,
            text: text.into(),
            selected: false,
        }
    }

    /// Set the machine value using builder pattern.
    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Set the selection flag using builder pattern.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl From<RawOption> for SelectOption {
    fn from(raw: RawOption) -> Self {
        let value = match raw.value {
            Some(value) if !value.is_empty() => value,
            _ => raw.text.clone(),
        };
        Self {
            value,
            text: raw.text,
            selected: raw.selected,
        }
    }
}

impl From<SelectOption> for RawOption {
    fn from(option: SelectOption) -> Self {
        Self {
            value: Some(option.value),
            text: option.text,
            selected: option.selected,
        }
    }
}

impl From<&str> for RawOption {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

fn deserialize_loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "option value must be a string or number, got {other}"
        ))),
    }
}
