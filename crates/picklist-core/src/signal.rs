//! Signal/slot notifications.
//!
//! A [`Signal`] fans a value out to every connected slot. Widgets use signals
//! to tell their host about value changes and redraws, and pages use them to
//! deliver document clicks and scrolls to open widgets.
//!
//! Connections made with [`Signal::connect_scoped`] return a
//! [`ConnectionGuard`]; dropping the guard disconnects the slot exactly once.
//!
//! # Re-entrancy
//!
//! Emission works on a snapshot of the connected slots, and the connection
//! table is not locked while a slot runs. A slot may therefore connect or
//! disconnect slots on the signal that is currently emitting, including
//! itself. A slot disconnected earlier in the same emission is skipped.
//!
//! # Example
//!
//! ```
//! use picklist_core::Signal;
//!
//! let value_changed = Signal::<String>::new();
//! let id = value_changed.connect(|value| println!("value is now {value}"));
//! value_changed.emit("banana".to_string());
//! assert!(value_changed.disconnect(id));
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// Identifies one slot connected to a [`Signal`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A notification channel with any number of connected slots.
///
/// Slots run on the emitting thread, in connection order.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .finish()
    }
}

impl<Args: 'static> Signal<Args> {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a slot. It stays connected until [`disconnect`](Self::disconnect)
    /// is called with the returned id.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Returns `false` if the id was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections.lock().contains_key(id)
    }

    /// Invoke every connected slot with `args`.
    #[tracing::instrument(skip_all, target = "picklist_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let snapshot: Vec<(ConnectionId, Slot<Args>)> = {
            let connections = self.connections.lock();
            connections
                .iter()
                .map(|(id, slot)| (id, Arc::clone(slot)))
                .collect()
        };
        tracing::trace!(target: targets::SIGNAL, slots = snapshot.len(), "emit");

        for (id, slot) in snapshot {
            if !self.is_connected(id) {
                continue;
            }
            slot(&args);
        }
    }

    /// Connect a slot that is disconnected when the returned guard drops.
    ///
    /// ```
    /// use picklist_core::Signal;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// let scrolled = Arc::new(Signal::<()>::new());
    /// let hits = Arc::new(AtomicUsize::new(0));
    /// let counter = hits.clone();
    /// let guard = scrolled.connect_scoped(move |_| {
    ///     counter.fetch_add(1, Ordering::SeqCst);
    /// });
    /// scrolled.emit(());
    /// drop(guard);
    /// scrolled.emit(());
    /// assert_eq!(hits.load(Ordering::SeqCst), 1);
    /// ```
    pub fn connect_scoped<F>(self: &Arc<Self>, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            signal: Arc::downgrade(self),
            id,
        }
    }
}

/// Owns one connection and removes it on drop.
///
/// Holds only a weak reference, so it never keeps the signal alive.
pub struct ConnectionGuard<Args: 'static> {
    signal: Weak<Signal<Args>>,
    id: ConnectionId,
}

impl<Args: 'static> ConnectionGuard<Args> {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Whether the connection is still registered on a live signal.
    pub fn is_connected(&self) -> bool {
        self.signal
            .upgrade()
            .is_some_and(|signal| signal.is_connected(self.id))
    }
}

impl<Args: 'static> fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("id", &self.id)
            .finish()
    }
}

impl<Args: 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.upgrade() {
            signal.disconnect(self.id);
        }
    }
}

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<String>: Send, Sync);
