//! Backing value encoding.
//!
//! Single-select widgets store the chosen option's value as a plain string.
//! Multi-select widgets store a JSON array of strings. Scalars in a decoded
//! array are kept in their string form so `3` and `"3"` name the same option.

use serde::Serialize;

use crate::error::{Result, SelectError};
use crate::store::SelectionMode;
use picklist_core::logging::targets;

/// The current value of a select widget, shaped by its selection mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SelectValue {
    /// The backing string of a single-select widget (empty when nothing is
    /// selected).
    Single(String),
    /// The selected values of a multi-select widget.
    Multiple(Vec<String>),
}

impl SelectValue {
    /// Interpret a raw backing string for the given mode.
    ///
    /// A malformed multi-select value reads as an empty selection.
    pub fn from_raw(mode: SelectionMode, raw: &str) -> Self {
        match mode {
            SelectionMode::Single => Self::Single(raw.to_string()),
            SelectionMode::Multiple => Self::Multiple(decode_values_lossy(raw)),
        }
    }

    /// Returns the single value, if this is a single-select value.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    /// Returns the value list, if this is a multi-select value.
    pub fn as_multiple(&self) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::Multiple(values) => Some(values),
        }
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(value) => value.is_empty(),
            Self::Multiple(values) => values.is_empty(),
        }
    }
}

/// Encode a list of values as the multi-select backing string.
pub fn encode_values(values: &[String]) -> String {
    match serde_json::to_string(values) {
        Ok(encoded) => encoded,
        Err(err) => {
            // Serializing a slice of strings cannot fail in practice.
            tracing::error!(target: targets::STORE, error = %err, "failed to encode values");
            String::from("[]")
        }
    }
}

/// Decode a multi-select backing string.
///
/// An empty string is an empty selection. Anything else must be a JSON
/// array whose elements are strings, numbers or booleans.
pub fn decode_values(raw: &str) -> Result<Vec<String>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let elements: Vec<serde_json::Value> = serde_json::from_str(raw)
        .map_err(|err| SelectError::malformed_value(raw, err.to_string()))?;

    elements
        .into_iter()
        .map(|element| match element {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::Bool(b) => Ok(b.to_string()),
            other => Err(SelectError::malformed_value(
                raw,
                format!("unsupported element {other}"),
            )),
        })
        .collect()
}

/// Decode a multi-select backing string, treating malformed input as an
/// empty selection.
pub fn decode_values_lossy(raw: &str) -> Vec<String> {
    decode_values(raw).unwrap_or_else(|err| {
        tracing::warn!(target: targets::STORE, error = %err, "discarding backing value");
        Vec::new()
    })
}
