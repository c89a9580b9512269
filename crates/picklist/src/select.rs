//! The select widget handle.
//!
//! A [`Select`] is built on a host element (a native choice control or a
//! text input), keeps its state behind a lock and reports changes through
//! signals:
//!
//! - [`changed`](Select::changed): the backing value after each committed
//!   selection change
//! - [`visibility_changed`](Select::visibility_changed): `true` on open,
//!   `false` on close
//! - [`redraw_requested`](Select::redraw_requested): state the view renders
//!   from has changed
//!
//! # Example
//!
//! ```
//! use picklist::{HostElement, NativeSelect, Page, RawOption, Select, SelectConfig};
//!
//! let native = NativeSelect::new("fruit")
//!     .with_option(RawOption::new("Apple").with_value("apple"))
//!     .with_option(RawOption::new("Banana").with_value("banana").with_selected(true));
//!
//! let select = Select::new(
//!     Some(HostElement::select(native)),
//!     SelectConfig::new(),
//!     Page::shared(),
//! )
//! .unwrap();
//!
//! assert_eq!(select.backing_input().value, "banana");
//! assert!(select.activate_value("apple"));
//! assert_eq!(select.backing_input().value, "apple");
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use picklist_core::logging::targets;
use picklist_core::{picklist_debug, picklist_trace, picklist_warn, PerfSpan, Signal};

use crate::codec::SelectValue;
use crate::config::SelectConfig;
use crate::control::{BackingInput, HostElement, SharedSelect};
use crate::coordinator::InstanceId;
use crate::engine::{Activation, CommitOutcome, SelectState};
use crate::error::{Result, SelectError};
use crate::option::{RawOption, SelectOption};
use crate::page::Page;
use crate::position::{Placement, PlacementRequest, Positioner};
use crate::visibility::{DismissReason, DismissalListeners};

/// Where the option list comes from.
#[derive(Debug)]
enum Source {
    Native(SharedSelect),
    Text,
}

struct SelectShared {
    id: InstanceId,
    config: SelectConfig,
    source: Source,
    page: Arc<Page>,
    positioner: Positioner,
    state: Mutex<SelectState>,
    changed: Signal<String>,
    visibility_changed: Signal<bool>,
    redraw_requested: Signal<()>,
}

impl SelectShared {
    /// Close the panel and notify. The state lock is released before any
    /// signal is emitted.
    fn dismiss(&self, reason: DismissReason) -> bool {
        let closed = self.state.lock().close(reason);
        if closed {
            tracing::debug!(target: targets::SELECT, id = ?self.id, ?reason, "dismissed");
            self.visibility_changed.emit(false);
            self.redraw_requested.emit(());
        }
        closed
    }

    fn notify_activation(&self, activation: &Activation) {
        self.changed.emit(activation.value.clone());
        if activation.closed {
            self.visibility_changed.emit(false);
        }
        self.redraw_requested.emit(());
    }
}

impl Drop for SelectShared {
    fn drop(&mut self) {
        self.state.get_mut().close(DismissReason::Programmatic);
        self.page.coordinator().unregister(self.id);
        picklist_trace!(id = ?self.id, "select destroyed");
    }
}

/// A select widget.
///
/// Cloning yields another handle to the same widget. Listeners attached
/// while the panel is open hold only weak references, so dropping the last
/// handle tears the widget down and unregisters it.
#[derive(Clone)]
pub struct Select {
    shared: Arc<SelectShared>,
}

impl Select {
    /// Build a widget on `element`.
    ///
    /// For a native choice control, the control's `multiple`, `disabled` and
    /// `placeholder` attributes override `config`, and its options are read
    /// as the initial option list. The control is renamed and hidden; a new
    /// backing input takes over its name and class. A text input becomes
    /// the backing input itself and takes its options from `config`.
    pub fn new(element: Option<HostElement>, mut config: SelectConfig, page: Arc<Page>) -> Result<Self> {
        let _perf = PerfSpan::new("select_new");

        let Some(element) = element else {
            picklist_warn!("no host element supplied");
            return Err(SelectError::MissingElement);
        };

        let (source, input, options, placeholder) = match element {
            HostElement::Select(native) => {
                let mut control = native.write();
                let input = BackingInput::replace_native(&mut control);
                config.multiple = control.multiple;
                config.disabled = control.disabled;
                let options = control.options.clone();
                let placeholder = control.placeholder.clone();
                drop(control);
                (Source::Native(native), input, options, placeholder)
            }
            HostElement::Input(text_input) => {
                let placeholder = text_input.placeholder.clone();
                let options = config.options.clone();
                (Source::Text, BackingInput::from(text_input), options, placeholder)
            }
            HostElement::Other { tag_name } => {
                tracing::warn!(target: targets::SELECT, tag_name = %tag_name, "unsupported host element");
                return Err(SelectError::unsupported_element(tag_name));
            }
        };
        if !placeholder.is_empty() {
            config.placeholder = placeholder;
        }

        let mut state = SelectState::new(config.selection_mode(), input);
        state.initialize(options);

        let id = page.coordinator().register(state.input().name.clone());
        tracing::debug!(
            target: targets::SELECT,
            ?id,
            name = %state.input().name,
            mode = ?config.selection_mode(),
            options = state.store().len(),
            "select created"
        );

        Ok(Self {
            shared: Arc::new(SelectShared {
                id,
                positioner: Positioner::from_config(&config),
                config,
                source,
                page,
                state: Mutex::new(state),
                changed: Signal::new(),
                visibility_changed: Signal::new(),
                redraw_requested: Signal::new(),
            }),
        })
    }

    /// Build a widget on the process-wide [`Page`].
    pub fn with_global_page(element: Option<HostElement>, config: SelectConfig) -> Result<Self> {
        Self::new(element, config, Page::global())
    }

    pub fn id(&self) -> InstanceId {
        self.shared.id
    }

    /// Effective configuration after element overrides.
    pub fn config(&self) -> &SelectConfig {
        &self.shared.config
    }

    pub fn page(&self) -> &Arc<Page> {
        &self.shared.page
    }

    pub fn is_disabled(&self) -> bool {
        self.shared.config.disabled
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Emitted with the new backing value after each selection change.
    pub fn changed(&self) -> &Signal<String> {
        &self.shared.changed
    }

    /// Emitted with `true` on open and `false` on close.
    pub fn visibility_changed(&self) -> &Signal<bool> {
        &self.shared.visibility_changed
    }

    /// Emitted whenever the rendered state changes.
    pub fn redraw_requested(&self) -> &Signal<()> {
        &self.shared.redraw_requested
    }

    // =========================================================================
    // Options and value
    // =========================================================================

    /// The current value.
    pub fn value(&self) -> SelectValue {
        self.shared.state.lock().value()
    }

    /// Snapshot of the hidden backing input.
    pub fn backing_input(&self) -> BackingInput {
        self.shared.state.lock().input().clone()
    }

    /// All options in order.
    pub fn options(&self) -> Vec<SelectOption> {
        self.shared.state.lock().store().options().to_vec()
    }

    /// Selected options in order.
    pub fn selected_options(&self) -> Vec<SelectOption> {
        self.shared.state.lock().selected_options()
    }

    /// Label for the closed-state box.
    pub fn display_text(&self) -> String {
        let config = &self.shared.config;
        self.shared.state.lock().display_text(&config.text, &config.placeholder)
    }

    /// Replace the option list and rebuild the value from it.
    ///
    /// With `None`, a widget built on a native control re-reads the
    /// control's current options; a widget built on a text input has no
    /// source to re-read and is left unchanged. Returns whether the options
    /// were replaced.
    pub fn replace_options(&self, options: Option<Vec<RawOption>>) -> bool {
        let options = match (options, &self.shared.source) {
            (Some(options), _) => options,
            (None, Source::Native(native)) => native.read().options.clone(),
            (None, Source::Text) => {
                picklist_debug!(id = ?self.shared.id, "no native control to re-read options from");
                return false;
            }
        };
        self.shared.state.lock().initialize(options);
        self.shared.redraw_requested.emit(());
        true
    }

    /// Activate an option.
    ///
    /// The option is matched by value against the current option list.
    /// Returns `false` if disabled or the value is no longer listed.
    pub fn activate(&self, option: &SelectOption) -> bool {
        if self.is_disabled() {
            tracing::debug!(target: targets::SELECT, id = ?self.shared.id, "activation ignored, disabled");
            return false;
        }
        let activation = self.shared.state.lock().activate(option);
        match activation {
            Some(activation) => {
                self.shared.notify_activation(&activation);
                true
            }
            None => false,
        }
    }

    /// Activate the option whose value equals the string form of `value`.
    ///
    /// Returns `false` if disabled or no such option exists.
    pub fn activate_value(&self, value: impl ToString) -> bool {
        let option = self.shared.state.lock().store().find(value).cloned();
        match option {
            Some(option) => self.activate(&option),
            None => false,
        }
    }

    /// Commit free text as a selection, adding an option if none matches.
    pub fn commit_text(&self, text: &str) -> CommitOutcome {
        if self.is_disabled() {
            return CommitOutcome::Ignored;
        }
        let outcome = self.shared.state.lock().commit_text(text);
        if let Some(activation) = outcome.activation() {
            self.shared.notify_activation(activation);
        }
        outcome
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    pub fn is_open(&self) -> bool {
        self.shared.state.lock().is_open()
    }

    /// Number of dismissal listeners attached right now.
    pub fn listener_count(&self) -> usize {
        self.shared.state.lock().visibility().listener_count()
    }

    /// Placement computed by the last open, while open.
    pub fn placement(&self) -> Option<Placement> {
        self.shared.state.lock().placement()
    }

    /// Open the panel.
    ///
    /// Other instances hear the open broadcast first, then this widget
    /// places its panel and attaches its dismissal listeners. Returns
    /// `false` if disabled or already open.
    pub fn open(&self, request: &PlacementRequest) -> bool {
        let _perf = PerfSpan::new("select_open");
        let shared = &self.shared;

        if shared.config.disabled {
            tracing::debug!(target: targets::SELECT, id = ?shared.id, "open ignored, disabled");
            return false;
        }
        if shared.state.lock().is_open() {
            return false;
        }

        // Announce before attaching our own subscription so we never
        // dismiss ourselves.
        shared.page.coordinator().broadcast_opened(shared.id);

        let placement = shared.positioner.place(request);
        let weak: Weak<SelectShared> = Arc::downgrade(&self.shared);
        let listeners = DismissalListeners::attach(
            &shared.page,
            shared.id,
            &shared.config.viewport,
            shared.config.one_open,
            move |reason| {
                if let Some(shared) = weak.upgrade() {
                    shared.dismiss(reason);
                }
            },
        );

        let opened = shared.state.lock().open(listeners, placement);
        if opened {
            tracing::debug!(target: targets::SELECT, id = ?shared.id, ?placement, "opened");
            shared.visibility_changed.emit(true);
            shared.redraw_requested.emit(());
        }
        opened
    }

    /// Close the panel. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        self.shared.dismiss(DismissReason::Programmatic)
    }

    /// Open if closed, close if open.
    pub fn toggle(&self, request: &PlacementRequest) -> bool {
        if self.is_open() {
            self.close()
        } else {
            self.open(request)
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Set the search box contents. Ignored unless search is enabled and
    /// the panel is open.
    pub fn set_search_term(&self, term: impl Into<String>) -> bool {
        if !self.shared.config.search {
            return false;
        }
        let changed = {
            let mut state = self.shared.state.lock();
            state.is_open() && state.set_search_term(term)
        };
        if changed {
            self.shared.redraw_requested.emit(());
        }
        changed
    }

    pub fn search_term(&self) -> Option<String> {
        self.shared.state.lock().search_term().map(str::to_string)
    }

    /// Options the open panel lists, filtered by the search term. Empty
    /// while closed.
    pub fn visible_options(&self) -> Vec<SelectOption> {
        self.shared.state.lock().visible_options()
    }
}

impl std::fmt::Debug for Select {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Select")
            .field("id", &self.shared.id)
            .field("source", &self.shared.source)
            .field("open", &self.is_open())
            .finish()
    }
}

static_assertions::assert_impl_all!(Select: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{NativeSelect, TextInput};
    use picklist_core::{Rect, Size};

    fn request() -> PlacementRequest {
        PlacementRequest::new(Rect::new(10.0, 10.0, 100.0, 20.0), Size::new(800.0, 600.0))
    }

    fn native_select(page: &Arc<Page>) -> Select {
        let native = NativeSelect::new("fruit")
            .with_option(RawOption::new("Apple").with_value("apple"))
            .with_option(RawOption::new("Banana").with_value("banana"));
        Select::new(Some(HostElement::select(native)), SelectConfig::new(), page.clone()).unwrap()
    }

    #[test]
    fn test_missing_element() {
        let result = Select::new(None, SelectConfig::new(), Page::shared());
        assert!(matches!(result, Err(SelectError::MissingElement)));
    }

    #[test]
    fn test_unsupported_element() {
        let result = Select::new(Some(HostElement::other("div")), SelectConfig::new(), Page::shared());
        match result {
            Err(SelectError::UnsupportedElement { tag_name }) => assert_eq!(tag_name, "div"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_registered_until_dropped() {
        let page = Page::shared();
        let select = native_select(&page);
        let clone = select.clone();
        assert_eq!(page.coordinator().live_count(), 1);
        drop(select);
        assert_eq!(page.coordinator().live_count(), 1);
        drop(clone);
        assert_eq!(page.coordinator().live_count(), 0);
    }

    #[test]
    fn test_drop_while_open_releases_listeners() {
        let page = Page::shared();
        let select = native_select(&page);
        assert!(select.open(&request()));
        assert_eq!(page.listener_count(), 2);
        drop(select);
        assert_eq!(page.listener_count(), 0);
        assert_eq!(page.coordinator().live_count(), 0);
    }

    #[test]
    fn test_open_is_idempotent() {
        let page = Page::shared();
        let select = native_select(&page);
        assert!(select.open(&request()));
        assert!(!select.open(&request()));
        assert_eq!(select.listener_count(), 2);
        assert!(select.placement().is_some());
        assert!(select.close());
        assert!(!select.close());
        assert!(select.placement().is_none());
    }

    #[test]
    fn test_text_input_replace_options_none_is_noop() {
        let page = Page::shared();
        let select = Select::new(
            Some(HostElement::input(TextInput::new("tags"))),
            SelectConfig::new().with_options(["a", "b"]),
            page,
        )
        .unwrap();
        assert!(!select.replace_options(None));
        assert_eq!(select.options().len(), 2);
    }

    #[test]
    fn test_search_requires_search_enabled() {
        let page = Page::shared();
        let select = native_select(&page);
        select.open(&request());
        assert!(!select.set_search_term("ap"));
        assert_eq!(select.visible_options().len(), 2);
    }
}
