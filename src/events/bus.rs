//! Per-kind subscriber lists with ordered, failure-isolated delivery.

use super::{EventKind, SessionEvent};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

type Handler = dyn Fn(&SessionEvent) + Send + Sync;

/// Token returned by [`EventBus::subscribe`], consumed by
/// [`EventBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    handler: Arc<Handler>,
}

#[derive(Default)]
struct BusInner {
    subscribers: HashMap<EventKind, Vec<Subscriber>>,
    next_id: u64,
}

/// Ordered delivery of [`SessionEvent`]s to registered subscribers.
///
/// Delivery is synchronous on the publishing (dispatcher) thread, in
/// registration order per kind. A panicking handler is isolated and logged;
/// later handlers still run. The bus carries its own lock, separate from
/// the session mutex, and never holds it while a handler runs — a handler
/// may freely re-enter the session or the bus.
#[derive(Default)]
pub struct EventBus {
    inner: RwLock<BusInner>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind. Handlers for the same kind
    /// are invoked in registration order.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.subscribers.entry(kind).or_default().push(Subscriber {
            id,
            handler: Arc::new(handler),
        });
        id
    }

    /// Detach one subscription. Returns whether it was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.write();
        for list in inner.subscribers.values_mut() {
            if let Some(index) = list.iter().position(|s| s.id == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    /// Whether anyone is subscribed to `kind`. The dispatcher uses this to
    /// skip payload construction when nobody is listening.
    pub fn has_subscribers(&self, kind: EventKind) -> bool {
        self.inner
            .read()
            .subscribers
            .get(&kind)
            .is_some_and(|list| !list.is_empty())
    }

    /// Deliver one event to every subscriber of its kind.
    pub fn publish(&self, event: &SessionEvent) {
        let kind = event.kind();
        // Snapshot the handler list so delivery runs without the bus lock
        // and a handler can subscribe/unsubscribe re-entrantly.
        let handlers: Vec<Arc<Handler>> = {
            let inner = self.inner.read();
            match inner.subscribers.get(&kind) {
                Some(list) => list.iter().map(|s| Arc::clone(&s.handler)).collect(),
                None => return,
            }
        };

        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                warn!(?kind, "event subscriber panicked; continuing delivery");
            }
        }
    }

    /// Detach every subscriber. The bus stays usable afterwards.
    pub fn release_all(&self) {
        self.inner.write().subscribers.clear();
    }

    /// Number of subscribers for one kind (diagnostics).
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner
            .read()
            .subscribers
            .get(&kind)
            .map_or(0, Vec::len)
    }
}
