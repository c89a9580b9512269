//! Widget configuration.
//!
//! [`SelectConfig`] can be built in code with the `with_*` methods or from a
//! JSON object of overrides using the camelCase keys hosts already use
//! (`isModal`, `oneOpen`, `className` and so on). Unknown keys are ignored.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::option::RawOption;
use crate::store::SelectionMode;
use picklist_core::logging::targets;

/// Default fraction of the bounding height below which the panel flips up.
pub const DEFAULT_FLIP_THRESHOLD: f32 = 0.75;

/// How the panel is positioned relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    /// Window-relative coordinates.
    #[default]
    Fixed,
    /// Coordinates relative to the anchor's offset parent.
    Absolute,
}

impl PositionMode {
    /// CSS `position` keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Absolute => "absolute",
        }
    }
}

/// The scroll container whose scrolling dismisses an open panel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    /// The document itself.
    #[default]
    Document,
    /// A scrollable element identified by the host.
    Element(String),
}

impl Viewport {
    pub fn element(id: impl Into<String>) -> Self {
        Self::Element(id.into())
    }
}

/// Configuration for a select widget.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectConfig {
    pub position: PositionMode,
    /// Show a search box inside the open panel.
    pub search: bool,
    pub multiple: bool,
    pub disabled: bool,
    /// Scroll container that dismisses the panel.
    pub viewport: Viewport,
    /// Measure placement against the viewport rectangle instead of the
    /// window.
    pub is_modal: bool,
    /// Close when another instance opens.
    pub one_open: bool,
    /// Render the panel inline instead of overlaid.
    pub inline: bool,
    /// Label shown when nothing is selected.
    pub placeholder: String,
    /// Shown in the closed box while nothing is selected, ahead of the
    /// placeholder.
    pub text: String,
    pub class_name: Option<String>,
    /// Options for text-input hosts.
    pub options: Vec<RawOption>,
    pub flip_threshold: f32,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            position: PositionMode::Fixed,
            search: false,
            multiple: false,
            disabled: false,
            viewport: Viewport::Document,
            is_modal: false,
            one_open: false,
            inline: false,
            placeholder: String::new(),
            text: String::new(),
            class_name: None,
            options: Vec::new(),
            flip_threshold: DEFAULT_FLIP_THRESHOLD,
        }
    }
}

impl SelectConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of overrides on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::default().merge_json(json)
    }

    /// Apply a JSON object of overrides on top of this configuration.
    pub fn merge_json(self, json: &str) -> Result<Self> {
        let overrides: ConfigOverrides = serde_json::from_str(json)?;
        Ok(self.merge(overrides))
    }

    /// Apply parsed overrides. Keys left unset keep their current value.
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        let ConfigOverrides {
            position,
            search,
            multiple,
            disabled,
            viewport,
            is_modal,
            one_open,
            inline,
            placeholder,
            text,
            class_name,
            options,
            flip_threshold,
        } = overrides;

        if let Some(v) = position {
            self.position = v;
        }
        if let Some(v) = search {
            self.search = v;
        }
        if let Some(v) = multiple {
            self.multiple = v;
        }
        if let Some(v) = disabled {
            self.disabled = v;
        }
        if let Some(v) = viewport {
            self.viewport = v;
        }
        if let Some(v) = is_modal {
            self.is_modal = v;
        }
        if let Some(v) = one_open {
            self.one_open = v;
        }
        if let Some(v) = inline {
            self.inline = v;
        }
        if let Some(v) = placeholder {
            self.placeholder = v;
        }
        if let Some(v) = text {
            self.text = v;
        }
        if class_name.is_some() {
            self.class_name = class_name;
        }
        if let Some(v) = options {
            self.options = v;
        }
        if let Some(v) = flip_threshold {
            self = self.with_flip_threshold(v);
        }
        self
    }

    /// Selection mode implied by `multiple`.
    pub fn selection_mode(&self) -> SelectionMode {
        SelectionMode::from_multiple(self.multiple)
    }

    /// Set the position mode using builder pattern.
    pub fn with_position(mut self, position: PositionMode) -> Self {
        self.position = position;
        self
    }

    /// Enable or disable the search box using builder pattern.
    pub fn with_search(mut self, search: bool) -> Self {
        self.search = search;
        self
    }

    /// Set multi-select mode using builder pattern.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Set the disabled flag using builder pattern.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the scroll container using builder pattern.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set modal placement using builder pattern.
    pub fn with_modal(mut self, is_modal: bool) -> Self {
        self.is_modal = is_modal;
        self
    }

    /// Set exclusive opening using builder pattern.
    pub fn with_one_open(mut self, one_open: bool) -> Self {
        self.one_open = one_open;
        self
    }

    /// Set inline rendering using builder pattern.
    pub fn with_inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Set the placeholder using builder pattern.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the no-selection display text using builder pattern.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the extra class name using builder pattern.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set the options for text-input hosts using builder pattern.
    pub fn with_options<I, O>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<RawOption>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the flip threshold using builder pattern.
    ///
    /// Values outside `0.0..=1.0` are clamped; a NaN falls back to the
    /// default.
    pub fn with_flip_threshold(mut self, threshold: f32) -> Self {
        self.flip_threshold = if threshold.is_nan() {
            tracing::warn!(target: targets::SELECT, "flip threshold is NaN, using default");
            DEFAULT_FLIP_THRESHOLD
        } else if !(0.0..=1.0).contains(&threshold) {
            tracing::warn!(target: targets::SELECT, threshold, "flip threshold clamped");
            threshold.clamp(0.0, 1.0)
        } else {
            threshold
        };
        self
    }
}

/// Partial configuration parsed from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub position: Option<PositionMode>,
    pub search: Option<bool>,
    pub multiple: Option<bool>,
    pub disabled: Option<bool>,
    pub viewport: Option<Viewport>,
    pub is_modal: Option<bool>,
    pub one_open: Option<bool>,
    pub inline: Option<bool>,
    pub placeholder: Option<String>,
    pub text: Option<String>,
    pub class_name: Option<String>,
    pub options: Option<Vec<RawOption>>,
    pub flip_threshold: Option<f32>,
}
