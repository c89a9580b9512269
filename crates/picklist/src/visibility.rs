//! Open/closed state and the listeners that dismiss an open panel.
//!
//! While a panel is open it holds a [`DismissalListeners`] set: a click
//! listener, a scroll listener and (for exclusive widgets) an open-broadcast
//! subscription. All three are scoped connections, so leaving the open state
//! drops the set and detaches every listener.

use std::fmt;

use picklist_core::logging::targets;
use picklist_core::ConnectionGuard;

use crate::config::Viewport;
use crate::coordinator::InstanceId;
use crate::page::{Page, PageClick, ScrollEvent};

/// Whether the panel is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Visibility {
    #[default]
    Closed,
    Open,
}

/// Why a panel closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissReason {
    /// An option was activated.
    Selection,
    /// The page was clicked outside the widget.
    OutsideClick,
    /// The configured scroll container scrolled.
    Scroll,
    /// Another exclusive instance opened.
    Exclusive(InstanceId),
    /// The host closed it.
    Programmatic,
}

/// The listeners attached while a panel is open.
#[derive(Default)]
pub struct DismissalListeners {
    click: Option<ConnectionGuard<PageClick>>,
    scroll: Option<ConnectionGuard<ScrollEvent>>,
    exclusive: Option<ConnectionGuard<InstanceId>>,
}

impl DismissalListeners {
    /// Attach dismissal listeners for instance `id` on `page`.
    ///
    /// `dismiss` is called with the reason whenever one of them fires. The
    /// open-broadcast subscription is only made when `exclusive` is set.
    pub fn attach<F>(page: &Page, id: InstanceId, viewport: &Viewport, exclusive: bool, dismiss: F) -> Self
    where
        F: Fn(DismissReason) + Clone + Send + Sync + 'static,
    {
        let on_click = dismiss.clone();
        let click = page.on_click(move |click| {
            if click.is_outside(id) {
                on_click(DismissReason::OutsideClick);
            }
        });

        let on_scroll = dismiss.clone();
        let watched = viewport.clone();
        let scroll = page.on_scroll(move |event| {
            if event.viewport == watched {
                on_scroll(DismissReason::Scroll);
            }
        });

        let exclusive = exclusive.then(|| {
            page.coordinator().subscribe(move |opener| {
                if *opener != id {
                    dismiss(DismissReason::Exclusive(*opener));
                }
            })
        });

        tracing::trace!(target: targets::VISIBILITY, ?id, exclusive = exclusive.is_some(), "listeners attached");
        Self {
            click: Some(click),
            scroll: Some(scroll),
            exclusive,
        }
    }

    /// Number of attached listeners.
    pub fn len(&self) -> usize {
        usize::from(self.click.is_some())
            + usize::from(self.scroll.is_some())
            + usize::from(self.exclusive.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detach every listener. Returns how many were attached.
    pub fn release(&mut self) -> usize {
        let count = self.len();
        self.click = None;
        self.scroll = None;
        self.exclusive = None;
        count
    }
}

impl fmt::Debug for DismissalListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissalListeners")
            .field("click", &self.click.is_some())
            .field("scroll", &self.scroll.is_some())
            .field("exclusive", &self.exclusive.is_some())
            .finish()
    }
}

/// Two-state visibility machine.
///
/// Listeners exist exactly while the state is [`Visibility::Open`].
#[derive(Debug, Default)]
pub struct VisibilityMachine {
    state: Visibility,
    listeners: DismissalListeners,
}

impl VisibilityMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == Visibility::Open
    }

    /// Number of listeners currently attached.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Enter the open state with a freshly attached listener set.
    ///
    /// Returns `false` if already open; the new listeners are then dropped
    /// and the existing ones kept.
    pub fn open(&mut self, listeners: DismissalListeners) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = Visibility::Open;
        self.listeners = listeners;
        true
    }

    /// Enter the closed state, detaching all listeners.
    ///
    /// Returns `false` if already closed.
    pub fn close(&mut self, reason: DismissReason) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = Visibility::Closed;
        let released = self.listeners.release();
        tracing::debug!(target: targets::VISIBILITY, ?reason, released, "panel closed");
        true
    }
}
