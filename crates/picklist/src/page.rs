//! The page-level event surface.
//!
//! A [`Page`] stands in for the document a set of widgets lives on. The host
//! forwards document clicks and scrolls to it, and open widgets listen to
//! those events to dismiss themselves. Widgets that share a page also share
//! its [`Coordinator`].

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Viewport;
use crate::coordinator::{Coordinator, InstanceId};
use picklist_core::logging::targets;
use picklist_core::{ConnectionGuard, Signal};

/// A pointer press somewhere on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageClick {
    /// The widget whose element tree contains the click target, if any.
    pub within: Option<InstanceId>,
}

impl PageClick {
    /// A click outside every widget.
    pub fn outside() -> Self {
        Self { within: None }
    }

    /// A click inside the given widget.
    pub fn inside(id: InstanceId) -> Self {
        Self { within: Some(id) }
    }

    /// Whether the click landed outside `id`.
    pub fn is_outside(&self, id: InstanceId) -> bool {
        self.within != Some(id)
    }
}

/// A scroll of some container on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollEvent {
    pub viewport: Viewport,
}

/// Document-wide events plus the widget coordinator.
#[derive(Debug, Default)]
pub struct Page {
    coordinator: Coordinator,
    clicks: Arc<Signal<PageClick>>,
    scrolls: Arc<Signal<ScrollEvent>>,
}

/// Process-wide page (lazy initialized).
static GLOBAL_PAGE: Mutex<Option<Arc<Page>>> = Mutex::new(None);

impl Page {
    /// Create an isolated page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an isolated page behind a shared handle.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// The process-wide page, created on first use.
    pub fn global() -> Arc<Self> {
        let mut guard = GLOBAL_PAGE.lock();
        guard.get_or_insert_with(Self::shared).clone()
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Forward a document click.
    pub fn click(&self, click: PageClick) {
        tracing::trace!(target: targets::VISIBILITY, within = ?click.within, "page click");
        self.clicks.emit(click);
    }

    /// Forward a scroll of `viewport`.
    pub fn scroll(&self, viewport: Viewport) {
        tracing::trace!(target: targets::VISIBILITY, ?viewport, "page scroll");
        self.scrolls.emit(ScrollEvent { viewport });
    }

    /// Listen for document clicks until the guard is dropped.
    pub fn on_click<F>(&self, slot: F) -> ConnectionGuard<PageClick>
    where
        F: Fn(&PageClick) + Send + Sync + 'static,
    {
        self.clicks.connect_scoped(slot)
    }

    /// Listen for scrolls until the guard is dropped.
    pub fn on_scroll<F>(&self, slot: F) -> ConnectionGuard<ScrollEvent>
    where
        F: Fn(&ScrollEvent) + Send + Sync + 'static,
    {
        self.scrolls.connect_scoped(slot)
    }

    /// Total number of listeners attached to this page: click, scroll and
    /// open-broadcast subscriptions.
    pub fn listener_count(&self) -> usize {
        self.clicks.connection_count()
            + self.scrolls.connection_count()
            + self.coordinator.subscriber_count()
    }
}

static_assertions::assert_impl_all!(Page: Send, Sync);
