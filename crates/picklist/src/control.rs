//! Host elements a select widget can be built on.
//!
//! A widget either replaces a native choice control ([`NativeSelect`]) or
//! takes over a text input ([`TextInput`]). In both cases the form-visible
//! value lives in a hidden [`BackingInput`].

use std::sync::Arc;

use parking_lot::RwLock;

use crate::option::RawOption;

/// Suffix appended to the native control's name once it is replaced, so
/// that only the backing input is submitted under the original name.
pub const ORIGINAL_NAME_SUFFIX: &str = "_original";

/// A native choice control as the host page sees it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeSelect {
    pub name: String,
    pub class_name: String,
    pub options: Vec<RawOption>,
    pub multiple: bool,
    pub disabled: bool,
    pub placeholder: String,
    pub hidden: bool,
}

impl NativeSelect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append an option using builder pattern.
    pub fn with_option(mut self, option: impl Into<RawOption>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Set the class attribute using builder pattern.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Set the `multiple` attribute using builder pattern.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Set the `disabled` attribute using builder pattern.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the `placeholder` attribute using builder pattern.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Wrap in a shared handle the host can keep mutating.
    pub fn into_shared(self) -> SharedSelect {
        Arc::new(RwLock::new(self))
    }
}

/// A native control shared between the host and the widget.
///
/// The host may change its options after construction; the widget re-reads
/// them on [`Select::replace_options(None)`](crate::Select::replace_options).
pub type SharedSelect = Arc<RwLock<NativeSelect>>;

/// A text input that becomes the widget's backing input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInput {
    pub name: String,
    pub class_name: String,
    pub value: String,
    pub placeholder: String,
}

impl TextInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the initial value using builder pattern.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the class attribute using builder pattern.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Set the `placeholder` attribute using builder pattern.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}

/// The element a widget is attached to.
#[derive(Debug, Clone)]
pub enum HostElement {
    Select(SharedSelect),
    Input(TextInput),
    /// Any other element. Construction fails for these.
    Other { tag_name: String },
}

impl HostElement {
    /// Wrap a native control in a fresh shared handle.
    pub fn select(native: NativeSelect) -> Self {
        Self::Select(native.into_shared())
    }

    pub fn input(input: TextInput) -> Self {
        Self::Input(input)
    }

    pub fn other(tag_name: impl Into<String>) -> Self {
        Self::Other {
            tag_name: tag_name.into(),
        }
    }

    /// Lowercase tag name of the element.
    pub fn tag_name(&self) -> &str {
        match self {
            Self::Select(_) => "select",
            Self::Input(_) => "input",
            Self::Other { tag_name } => tag_name,
        }
    }
}

impl From<SharedSelect> for HostElement {
    fn from(native: SharedSelect) -> Self {
        Self::Select(native)
    }
}

impl From<TextInput> for HostElement {
    fn from(input: TextInput) -> Self {
        Self::Input(input)
    }
}

/// The hidden input that carries the widget's form value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackingInput {
    pub name: String,
    pub class_name: String,
    pub value: String,
}

impl BackingInput {
    /// Take over a native control.
    ///
    /// The backing input inherits the control's name and class. The control
    /// itself is renamed, stripped of its class and hidden.
    pub fn replace_native(native: &mut NativeSelect) -> Self {
        let input = Self {
            name: native.name.clone(),
            class_name: std::mem::take(&mut native.class_name),
            value: String::new(),
        };
        native.name.push_str(ORIGINAL_NAME_SUFFIX);
        native.hidden = true;
        input
    }
}

impl From<TextInput> for BackingInput {
    fn from(input: TextInput) -> Self {
        Self {
            name: input.name,
            class_name: input.class_name,
            value: input.value,
        }
    }
}
