//! The option store.
//!
//! Holds the normalized option list and the per-option selection flags,
//! and answers the search filter used by the panel.

use regex::{Regex, RegexBuilder};

use crate::option::{RawOption, SelectOption};
use picklist_core::logging::targets;

/// Terms up to this many characters only match at the start of a label.
const PREFIX_MATCH_LEN: usize = 3;

/// Whether a widget allows one or many selected options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum SelectionMode {
    /// At most one option is selected.
    #[default]
    Single,
    /// Any number of options may be selected.
    Multiple,
}

impl SelectionMode {
    /// Mode for a `multiple` flag.
    pub fn from_multiple(multiple: bool) -> Self {
        if multiple {
            Self::Multiple
        } else {
            Self::Single
        }
    }

    pub fn is_multiple(self) -> bool {
        self == Self::Multiple
    }
}

/// Ordered list of options with their selection flags.
#[derive(Debug, Clone, Default)]
pub struct OptionStore {
    mode: SelectionMode,
    options: Vec<SelectOption>,
}

impl OptionStore {
    /// Create an empty store.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            options: Vec::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Replace the whole option list.
    ///
    /// In single mode only the first option flagged as selected keeps its
    /// flag. Returns the first selected option, if any.
    pub fn initialize<I>(&mut self, raw: I) -> Option<&SelectOption>
    where
        I: IntoIterator<Item = RawOption>,
    {
        self.options = raw.into_iter().map(SelectOption::from).collect();

        if self.mode == SelectionMode::Single {
            let mut seen = false;
            let mut dropped = 0usize;
            for option in &mut self.options {
                if option.selected {
                    if seen {
                        option.selected = false;
                        dropped += 1;
                    }
                    seen = true;
                }
            }
            if dropped > 0 {
                tracing::debug!(
                    target: targets::STORE,
                    dropped,
                    "cleared extra selected flags in single mode"
                );
            }
        }

        tracing::trace!(target: targets::STORE, count = self.options.len(), "options initialized");
        self.first_selected()
    }

    /// Append an option at the end of the list.
    pub fn push(&mut self, option: SelectOption) {
        self.options.push(option);
    }

    /// The first selected option in list order.
    pub fn first_selected(&self) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.selected)
    }

    /// All selected options in list order.
    pub fn selected(&self) -> impl Iterator<Item = &SelectOption> {
        self.options.iter().filter(|o| o.selected)
    }

    /// Find the first option whose value equals the string form of `value`.
    pub fn find(&self, value: impl ToString) -> Option<&SelectOption> {
        let value = value.to_string();
        self.options.iter().find(|o| o.has_value(&value))
    }

    /// Mark the option(s) with the given value as selected.
    ///
    /// In single mode every other flag is cleared and only the first match
    /// is set. Returns `false` if no option has the value.
    pub fn set_selected(&mut self, value: impl ToString) -> bool {
        let value = value.to_string();
        match self.mode {
            SelectionMode::Single => {
                let Some(index) = self.options.iter().position(|o| o.has_value(&value)) else {
                    return false;
                };
                for (i, option) in self.options.iter_mut().enumerate() {
                    option.selected = i == index;
                }
                true
            }
            SelectionMode::Multiple => {
                let mut found = false;
                for option in self.options.iter_mut().filter(|o| o.has_value(&value)) {
                    option.selected = true;
                    found = true;
                }
                found
            }
        }
    }

    /// Clear the selected flag on the option(s) with the given value.
    ///
    /// Returns `false` if no option has the value.
    pub fn clear_selected(&mut self, value: impl ToString) -> bool {
        let value = value.to_string();
        let mut found = false;
        for option in self.options.iter_mut().filter(|o| o.has_value(&value)) {
            option.selected = false;
            found = true;
        }
        found
    }

    /// Clear every selected flag.
    pub fn clear_all(&mut self) {
        for option in &mut self.options {
            option.selected = false;
        }
    }

    /// Options whose label matches `term`, in list order.
    ///
    /// `None` or an empty term matches everything.
    pub fn filter(&self, term: Option<&str>) -> Vec<&SelectOption> {
        match term.and_then(SearchPattern::new) {
            Some(pattern) => self.options.iter().filter(|o| pattern.matches(&o.text)).collect(),
            None => self.options.iter().collect(),
        }
    }
}

/// A compiled search term.
///
/// The term is matched literally and case-insensitively. Short terms (up
/// to three characters) must match at the start of the label; longer terms
/// may match anywhere.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    regex: Regex,
    prefix_len: Option<usize>,
}

impl SearchPattern {
    /// Compile a term. Returns `None` for an empty term, which matches
    /// everything.
    pub fn new(term: &str) -> Option<Self> {
        if term.is_empty() {
            return None;
        }

        let regex = match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => regex,
            Err(err) => {
                tracing::warn!(target: targets::STORE, error = %err, term, "search term ignored");
                return None;
            }
        };

        let len = term.chars().count();
        let prefix_len = (len <= PREFIX_MATCH_LEN).then_some(len);
        Some(Self { regex, prefix_len })
    }

    /// Whether a label matches this term.
    pub fn matches(&self, text: &str) -> bool {
        match self.prefix_len {
            Some(len) => {
                let end = text
                    .char_indices()
                    .nth(len)
                    .map_or(text.len(), |(index, _)| index);
                self.regex.is_match(&text[..end])
            }
            None => self.regex.is_match(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(value: &str, text: &str, selected: bool) -> RawOption {
        RawOption::new(text).with_value(value).with_selected(selected)
    }

    fn fruit_store() -> OptionStore {
        let mut store = OptionStore::new(SelectionMode::Single);
        store.initialize(vec![
            raw("apple", "Apple", false),
            raw("banana", "Banana", false),
            raw("pineapple", "Pineapple", false),
            raw("apricot", "Apricot", false),
        ]);
        store
    }

    #[test]
    fn test_single_mode_dedupes_selected() {
        let mut store = OptionStore::new(SelectionMode::Single);
        let first = store
            .initialize(vec![
                raw("a", "A", false),
                raw("b", "B", true),
                raw("c", "C", true),
            ])
            .cloned();
        assert_eq!(first.map(|o| o.value), Some("b".to_string()));
        assert_eq!(store.selected().count(), 1);
        assert!(!store.options()[2].selected);
    }

    #[test]
    fn test_multiple_mode_keeps_all_selected() {
        let mut store = OptionStore::new(SelectionMode::Multiple);
        store.initialize(vec![raw("a", "A", true), raw("b", "B", true)]);
        assert_eq!(store.selected().count(), 2);
    }

    #[test]
    fn test_set_selected_single_clears_others() {
        let mut store = fruit_store();
        assert!(store.set_selected("apple"));
        assert!(store.set_selected("banana"));
        let selected: Vec<_> = store.selected().map(|o| o.value.as_str()).collect();
        assert_eq!(selected, vec!["banana"]);
        assert!(!store.set_selected("cherry"));
        assert_eq!(store.selected().count(), 1);
    }

    #[test]
    fn test_values_compare_as_strings() {
        let mut store = OptionStore::new(SelectionMode::Multiple);
        store.initialize(vec![raw("3", "Three", false), raw("4", "Four", false)]);
        assert!(store.set_selected(3));
        assert!(store.find(3).is_some_and(|o| o.selected));
        assert!(store.clear_selected("3"));
        assert_eq!(store.selected().count(), 0);
    }

    #[test]
    fn test_filter_short_term_is_prefix() {
        let store = fruit_store();
        let labels: Vec<_> = store.filter(Some("ap")).iter().map(|o| o.text.as_str()).collect();
        assert_eq!(labels, vec!["Apple", "Apricot"]);
    }

    #[test]
    fn test_filter_long_term_matches_anywhere() {
        let store = fruit_store();
        let labels: Vec<_> = store.filter(Some("APPLE")).iter().map(|o| o.text.as_str()).collect();
        assert_eq!(labels, vec!["Apple", "Pineapple"]);
    }

    #[test]
    fn test_filter_empty_term_matches_all() {
        let store = fruit_store();
        assert_eq!(store.filter(None).len(), 4);
        assert_eq!(store.filter(Some("")).len(), 4);
    }

    #[test]
    fn test_filter_escapes_metacharacters() {
        let mut store = OptionStore::new(SelectionMode::Single);
        store.initialize(vec![RawOption::new("a.b"), RawOption::new("axb"), RawOption::new("(x)")]);
        let labels: Vec<_> = store.filter(Some("a.b")).iter().map(|o| o.text.as_str()).collect();
        assert_eq!(labels, vec!["a.b"]);
        assert_eq!(store.filter(Some("(x")).len(), 1);
    }

    #[test]
    fn test_search_pattern_handles_multibyte_labels() {
        let pattern = SearchPattern::new("é").unwrap();
        assert!(pattern.matches("Éclair"));
        assert!(!pattern.matches("Café"));
    }
}
