//! The selection engine.
//!
//! [`SelectState`] owns everything a widget mutates: the option store, the
//! backing input, the display label, the search term, the visibility machine
//! and the last placement. The [`Select`](crate::Select) handle wraps it in a
//! lock and turns the outcomes returned here into notifications.

use crate::codec::{self, SelectValue};
use crate::control::BackingInput;
use crate::option::{RawOption, SelectOption};
use crate::position::Placement;
use crate::store::{OptionStore, SelectionMode};
use crate::visibility::{DismissReason, DismissalListeners, VisibilityMachine};
use picklist_core::logging::targets;

/// Direction of a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
}

/// Result of activating an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// The new backing value.
    pub value: String,
    pub toggle: Toggle,
    /// Whether the activation closed an open panel.
    pub closed: bool,
}

/// Result of committing free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Blank text; nothing happened.
    Ignored,
    /// The matching option was already selected.
    AlreadySelected,
    /// An existing option was selected.
    Selected(Activation),
    /// A new option was appended and selected.
    Added(Activation),
}

impl CommitOutcome {
    /// The activation, if the commit changed the selection.
    pub fn activation(&self) -> Option<&Activation> {
        match self {
            Self::Selected(activation) | Self::Added(activation) => Some(activation),
            Self::Ignored | Self::AlreadySelected => None,
        }
    }
}

/// Mutable widget state.
#[derive(Debug)]
pub struct SelectState {
    store: OptionStore,
    input: BackingInput,
    text: String,
    search_term: Option<String>,
    visibility: VisibilityMachine,
    placement: Option<Placement>,
}

impl SelectState {
    /// Create empty state around a backing input.
    pub fn new(mode: SelectionMode, input: BackingInput) -> Self {
        Self {
            store: OptionStore::new(mode),
            input,
            text: String::new(),
            search_term: None,
            visibility: VisibilityMachine::new(),
            placement: None,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.store.mode()
    }

    pub fn store(&self) -> &OptionStore {
        &self.store
    }

    pub fn input(&self) -> &BackingInput {
        &self.input
    }

    /// Cached label of the single selection.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn visibility(&self) -> &VisibilityMachine {
        &self.visibility
    }

    pub fn is_open(&self) -> bool {
        self.visibility.is_open()
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Replace the option list and rebuild the backing value from it.
    pub fn initialize<I>(&mut self, raw: I)
    where
        I: IntoIterator<Item = RawOption>,
    {
        let first = self.store.initialize(raw).cloned();
        match self.store.mode() {
            SelectionMode::Single => {
                match first {
                    Some(option) => {
                        self.input.value = option.value;
                        self.text = option.text;
                    }
                    None => {
                        self.input.value.clear();
                        self.text.clear();
                    }
                }
            }
            SelectionMode::Multiple => {
                let mut values: Vec<String> = Vec::new();
                for option in self.store.selected() {
                    if !values.contains(&option.value) {
                        values.push(option.value.clone());
                    }
                }
                self.input.value = codec::encode_values(&values);
            }
        }
        tracing::debug!(
            target: targets::STORE,
            options = self.store.len(),
            value = %self.input.value,
            "state initialized"
        );
    }

    /// The current value.
    pub fn value(&self) -> SelectValue {
        SelectValue::from_raw(self.store.mode(), &self.input.value)
    }

    /// Activate an option: select it, or in multi mode toggle it.
    ///
    /// The option is looked up by value and the stored copy is used. Returns
    /// `None` without touching any state if the store has no such value.
    /// Closes the panel if it was open.
    pub fn activate(&mut self, option: &SelectOption) -> Option<Activation> {
        let Some(option) = self.store.find(&option.value).cloned() else {
            tracing::debug!(target: targets::STORE, value = %option.value, "activation ignored, option not in store");
            return None;
        };
        let toggle = match self.store.mode() {
            SelectionMode::Single => {
                self.store.set_selected(&option.value);
                self.input.value = option.value.clone();
                self.text = option.text.clone();
                Toggle::Selected
            }
            SelectionMode::Multiple => self.toggle_multiple(&option.value),
        };
        let closed = self.close(DismissReason::Selection);
        tracing::debug!(
            target: targets::STORE,
            value = %option.value,
            ?toggle,
            backing = %self.input.value,
            "option activated"
        );
        Some(Activation {
            value: self.input.value.clone(),
            toggle,
            closed,
        })
    }

    fn toggle_multiple(&mut self, value: &str) -> Toggle {
        let mut values = match codec::decode_values(&self.input.value) {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(target: targets::STORE, error = %err, "resetting malformed selection");
                self.store.clear_all();
                Vec::new()
            }
        };

        let toggle = if values.iter().any(|v| v == value) {
            self.store.clear_selected(value);
            Toggle::Deselected
        } else {
            values.push(value.to_string());
            self.store.set_selected(value);
            Toggle::Selected
        };

        // Options sharing a value are flagged together, so the encoded list
        // holds each selected value once and nothing the store has cleared.
        let mut kept: Vec<String> = Vec::with_capacity(values.len());
        for v in values {
            let selected = self.store.find(&v).is_some_and(|o| o.selected);
            if selected && !kept.contains(&v) {
                kept.push(v);
            }
        }
        self.input.value = codec::encode_values(&kept);
        toggle
    }

    /// Commit free text typed by the user.
    ///
    /// Blank text is ignored. Text equal to an existing option's value
    /// selects that option; anything else is appended as a new option whose
    /// value and label are the text, and selected. The search term is
    /// cleared whenever the selection changes.
    pub fn commit_text(&mut self, text: &str) -> CommitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return CommitOutcome::Ignored;
        }

        let existing = self.store.find(text).cloned();
        let (option, added) = match existing {
            Some(option) if option.selected => return CommitOutcome::AlreadySelected,
            Some(option) => (option, false),
            None => {
                let option = SelectOption::new(text, text);
                self.store.push(option.clone());
                tracing::debug!(target: targets::STORE, text, "appended committed option");
                (option, true)
            }
        };

        let Some(activation) = self.activate(&option) else {
            return CommitOutcome::Ignored;
        };
        self.search_term = None;
        if added {
            CommitOutcome::Added(activation)
        } else {
            CommitOutcome::Selected(activation)
        }
    }

    /// Set the search term. Returns `false` if it did not change.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        let term = (!term.is_empty()).then_some(term);
        if term == self.search_term {
            return false;
        }
        self.search_term = term;
        true
    }

    /// Options the open panel shows. Empty while closed.
    pub fn visible_options(&self) -> Vec<SelectOption> {
        if !self.is_open() {
            return Vec::new();
        }
        self.store
            .filter(self.search_term.as_deref())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Selected options in list order, for tag rendering.
    pub fn selected_options(&self) -> Vec<SelectOption> {
        self.store.selected().cloned().collect()
    }

    /// Label for the closed-state box.
    ///
    /// Single mode shows the selected label and multi mode shows nothing
    /// once a tag exists. With no selection the configured `default_text`
    /// is shown, or `placeholder` if that is empty.
    pub fn display_text(&self, default_text: &str, placeholder: &str) -> String {
        match self.store.mode() {
            SelectionMode::Single if !self.text.is_empty() => self.text.clone(),
            SelectionMode::Multiple if self.store.selected().next().is_some() => String::new(),
            _ if !default_text.is_empty() => default_text.to_string(),
            _ => placeholder.to_string(),
        }
    }

    /// Enter the open state. Returns `false` if already open.
    pub fn open(&mut self, listeners: DismissalListeners, placement: Placement) -> bool {
        if !self.visibility.open(listeners) {
            return false;
        }
        self.placement = Some(placement);
        self.search_term = None;
        true
    }

    /// Enter the closed state. Returns `false` if already closed.
    pub fn close(&mut self, reason: DismissReason) -> bool {
        if !self.visibility.close(reason) {
            return false;
        }
        self.placement = None;
        self.search_term = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(value: &str, selected: bool) -> RawOption {
        RawOption::new(value.to_uppercase())
            .with_value(value)
            .with_selected(selected)
    }

    fn state(mode: SelectionMode, options: Vec<RawOption>) -> SelectState {
        let mut state = SelectState::new(mode, BackingInput::default());
        state.initialize(options);
        state
    }

    #[test]
    fn test_initialize_single_uses_first_selected() {
        let state = state(
            SelectionMode::Single,
            vec![raw("a", false), raw("b", true), raw("c", true)],
        );
        assert_eq!(state.input().value, "b");
        assert_eq!(state.text(), "B");
        assert_eq!(state.value(), SelectValue::Single("b".into()));
    }

    #[test]
    fn test_initialize_single_without_selection() {
        let state = state(SelectionMode::Single, vec![raw("a", false)]);
        assert_eq!(state.input().value, "");
        assert_eq!(state.display_text("", "Pick"), "Pick");
    }

    #[test]
    fn test_initialize_multiple_encodes_selected() {
        let state = state(
            SelectionMode::Multiple,
            vec![raw("a", true), raw("b", false), raw("c", true)],
        );
        assert_eq!(state.input().value, r#"["a","c"]"#);
    }

    #[test]
    fn test_single_activate_replaces_selection() {
        let mut state = state(SelectionMode::Single, vec![raw("a", true), raw("b", false)]);
        let b = state.store().find("b").cloned().unwrap();
        let activation = state.activate(&b).unwrap();
        assert_eq!(activation.value, "b");
        assert_eq!(activation.toggle, Toggle::Selected);
        assert!(!activation.closed);
        assert_eq!(state.selected_options().len(), 1);
        assert_eq!(state.text(), "B");
    }

    #[test]
    fn test_multiple_activate_toggles() {
        let mut state = state(
            SelectionMode::Multiple,
            vec![raw("a", false), raw("b", false), raw("c", false)],
        );
        let a = state.store().find("a").cloned().unwrap();
        let b = state.store().find("b").cloned().unwrap();
        let c = state.store().find("c").cloned().unwrap();

        state.activate(&a);
        state.activate(&b);
        state.activate(&c);
        assert_eq!(state.input().value, r#"["a","b","c"]"#);

        let activation = state.activate(&b).unwrap();
        assert_eq!(activation.toggle, Toggle::Deselected);
        assert_eq!(state.input().value, r#"["a","c"]"#);
        assert!(!state.store().find("b").unwrap().selected);
    }

    #[test]
    fn test_toggle_twice_restores_value() {
        let mut state = state(SelectionMode::Multiple, vec![raw("a", true), raw("b", false)]);
        let before = state.input().value.clone();
        let b = state.store().find("b").cloned().unwrap();
        state.activate(&b);
        state.activate(&b);
        assert_eq!(state.input().value, before);
    }

    #[test]
    fn test_stale_option_is_ignored() {
        for mode in [SelectionMode::Single, SelectionMode::Multiple] {
            let mut state = state(mode, vec![raw("a", false), raw("b", false)]);
            let stale = state.store().find("a").cloned().unwrap();
            state.initialize(vec![raw("x", false), raw("y", false)]);
            let before = state.input().value.clone();

            assert_eq!(state.activate(&stale), None);
            assert_eq!(state.input().value, before);
            assert!(state.selected_options().is_empty());
        }
    }

    #[test]
    fn test_activate_uses_stored_option() {
        let mut state = state(SelectionMode::Single, vec![raw("a", false)]);
        let forged = SelectOption::new("a", "Forged label");
        state.activate(&forged).unwrap();
        assert_eq!(state.text(), "A");
        assert_eq!(state.input().value, "a");
    }

    #[test]
    fn test_shared_value_encoded_once() {
        let mut state = state(SelectionMode::Multiple, vec![raw("a", true), raw("a", true)]);
        assert_eq!(state.input().value, r#"["a"]"#);

        let a = state.store().find("a").cloned().unwrap();
        let activation = state.activate(&a).unwrap();
        assert_eq!(activation.toggle, Toggle::Deselected);
        assert_eq!(state.input().value, "[]");
        assert!(state.selected_options().is_empty());

        state.activate(&a).unwrap();
        assert_eq!(state.input().value, r#"["a"]"#);
        assert_eq!(state.selected_options().len(), 2);
    }

    #[test]
    fn test_malformed_backing_value_resets() {
        let mut state = state(SelectionMode::Multiple, vec![raw("a", true), raw("b", false)]);
        state.input.value = "not json".into();
        let b = state.store().find("b").cloned().unwrap();
        state.activate(&b);
        assert_eq!(state.input().value, r#"["b"]"#);
        let selected: Vec<_> = state.selected_options().into_iter().map(|o| o.value).collect();
        assert_eq!(selected, vec!["b"]);
    }

    #[test]
    fn test_commit_text() {
        let mut state = state(SelectionMode::Multiple, vec![raw("a", false)]);
        assert_eq!(state.commit_text("   "), CommitOutcome::Ignored);

        let outcome = state.commit_text("a");
        assert!(matches!(outcome, CommitOutcome::Selected(_)));
        assert_eq!(state.commit_text("a"), CommitOutcome::AlreadySelected);

        state.set_search_term("ne");
        let outcome = state.commit_text(" new ");
        assert!(matches!(outcome, CommitOutcome::Added(_)));
        assert_eq!(state.store().len(), 2);
        assert_eq!(state.input().value, r#"["a","new"]"#);
        assert_eq!(state.search_term(), None);
    }

    #[test]
    fn test_commit_text_matches_value_not_label() {
        let mut state = state(
            SelectionMode::Multiple,
            vec![RawOption::new("new").with_value("1")],
        );
        let outcome = state.commit_text("new");
        assert!(matches!(outcome, CommitOutcome::Added(_)));
        assert_eq!(state.store().len(), 2);
        assert_eq!(state.input().value, r#"["new"]"#);
        assert!(!state.store().find("1").unwrap().selected);
    }

    #[test]
    fn test_display_text_multiple() {
        let mut state = state(SelectionMode::Multiple, vec![raw("a", false)]);
        assert_eq!(state.display_text("", "Tags"), "Tags");
        let a = state.store().find("a").cloned().unwrap();
        state.activate(&a);
        assert_eq!(state.display_text("", "Tags"), "");
    }

    #[test]
    fn test_display_text_falls_back_to_default_text() {
        let mut state = state(SelectionMode::Single, vec![raw("a", false)]);
        assert_eq!(state.display_text("Choose...", "Pick"), "Choose...");
        let a = state.store().find("a").cloned().unwrap();
        state.activate(&a);
        assert_eq!(state.display_text("Choose...", "Pick"), "A");
    }

    #[test]
    fn test_search_term_normalization() {
        let mut state = state(SelectionMode::Single, vec![]);
        assert!(!state.set_search_term(""));
        assert!(state.set_search_term("ap"));
        assert!(!state.set_search_term("ap"));
        assert!(state.set_search_term(""));
        assert_eq!(state.search_term(), None);
    }

    #[test]
    fn test_visible_options_empty_while_closed() {
        let state = state(SelectionMode::Single, vec![raw("a", false)]);
        assert!(state.visible_options().is_empty());
    }
}
