//! Cross-instance coordination.
//!
//! Every live widget is registered with a [`Coordinator`] and receives a
//! stable [`InstanceId`]. When a widget opens it broadcasts its id; widgets
//! configured for exclusive opening subscribe to the broadcast and close
//! themselves when someone else opens.

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use picklist_core::logging::targets;
use picklist_core::{ConnectionGuard, Signal};

new_key_type! {
    /// A unique identifier for a live select widget.
    pub struct InstanceId;
}

#[derive(Debug)]
struct InstanceEntry {
    label: String,
}

/// Registry of live widgets plus the "opened" broadcast channel.
///
/// Arena-backed so ids stay stable and are never reused while a stale id
/// could still be observed.
#[derive(Debug)]
pub struct Coordinator {
    instances: Mutex<SlotMap<InstanceId, InstanceEntry>>,
    opened: Arc<Signal<InstanceId>>,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    /// Create an empty coordinator.
    pub fn new() -> Self {
        Self {
            instances: Mutex::new(SlotMap::with_key()),
            opened: Arc::new(Signal::new()),
        }
    }

    /// Register a widget and return its id.
    pub fn register(&self, label: impl Into<String>) -> InstanceId {
        let label = label.into();
        let id = self.instances.lock().insert(InstanceEntry {
            label: label.clone(),
        });
        tracing::trace!(target: targets::COORDINATOR, ?id, label = %label, "registered instance");
        id
    }

    /// Remove a widget. Returns `false` if the id was not registered.
    pub fn unregister(&self, id: InstanceId) -> bool {
        let removed = self.instances.lock().remove(id);
        if let Some(entry) = &removed {
            tracing::trace!(target: targets::COORDINATOR, ?id, label = %entry.label, "unregistered instance");
        }
        removed.is_some()
    }

    pub fn is_live(&self, id: InstanceId) -> bool {
        self.instances.lock().contains_key(id)
    }

    /// Number of registered widgets.
    pub fn live_count(&self) -> usize {
        self.instances.lock().len()
    }

    /// Label given at registration time.
    pub fn label(&self, id: InstanceId) -> Option<String> {
        self.instances.lock().get(id).map(|entry| entry.label.clone())
    }

    /// Announce that `id` is about to open.
    ///
    /// Subscribers run synchronously on the calling thread.
    pub fn broadcast_opened(&self, id: InstanceId) {
        tracing::debug!(
            target: targets::COORDINATOR,
            ?id,
            subscribers = self.opened.connection_count(),
            "broadcasting open"
        );
        self.opened.emit(id);
    }

    /// Listen for open broadcasts. The subscription ends when the guard is
    /// dropped.
    pub fn subscribe<F>(&self, slot: F) -> ConnectionGuard<InstanceId>
    where
        F: Fn(&InstanceId) + Send + Sync + 'static,
    {
        self.opened.connect_scoped(slot)
    }

    /// Number of active open-broadcast subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.opened.connection_count()
    }
}

static_assertions::assert_impl_all!(Coordinator: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_register_and_unregister() {
        let coordinator = Coordinator::new();
        let a = coordinator.register("a");
        let b = coordinator.register("b");
        assert_ne!(a, b);
        assert_eq!(coordinator.live_count(), 2);
        assert_eq!(coordinator.label(a).as_deref(), Some("a"));

        assert!(coordinator.unregister(a));
        assert!(!coordinator.unregister(a));
        assert!(!coordinator.is_live(a));
        assert!(coordinator.is_live(b));
        assert_eq!(coordinator.live_count(), 1);
    }

    #[test]
    fn test_ids_not_reused_after_unregister() {
        let coordinator = Coordinator::new();
        let a = coordinator.register("a");
        coordinator.unregister(a);
        let b = coordinator.register("b");
        assert_ne!(a, b);
        assert!(!coordinator.is_live(a));
    }

    #[test]
    fn test_broadcast_reaches_subscribers() {
        let coordinator = Coordinator::new();
        let opener = coordinator.register("opener");
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = hits.clone();
        let guard = coordinator.subscribe(move |id| {
            assert_eq!(*id, opener);
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(coordinator.subscriber_count(), 1);

        coordinator.broadcast_opened(opener);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        drop(guard);
        assert_eq!(coordinator.subscriber_count(), 0);
        coordinator.broadcast_opened(opener);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
