//! Liveness-gated publish/subscribe registry.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Entry<E> {
    alive: Box<dyn Fn() -> bool + Send>,
    callback: Callback<E>,
}

struct Registry<E> {
    // Keyed by a monotonically increasing token so iteration order is
    // subscription order.
    entries: BTreeMap<u64, Entry<E>>,
    next_token: u64,
}

impl<E> Registry<E> {
    fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_token: 0,
        }
    }
}

/// Broadcast hub for one event type.
///
/// Clones share the same registry, so a hub handle can be handed to a worker
/// thread while the owning manager keeps another. Delivery is synchronous on
/// the notifying thread.
pub struct EventHub<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for EventHub<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E: 'static> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventHub<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new())),
        }
    }

    /// Register `callback` to run on every subsequent [`notify`](Self::notify)
    /// for as long as `owner` is alive.
    ///
    /// Only a weak reference to `owner` is kept; once the last `Arc` to it is
    /// dropped the entry stops being delivered and is pruned lazily. The
    /// callback must not capture a strong reference to `owner`, otherwise the
    /// subscription keeps itself alive forever.
    ///
    /// The returned token removes the entry eagerly via
    /// [`Subscription::unsubscribe`]. Dropping the token does nothing:
    /// delivery depends solely on owner liveness.
    pub fn subscribe<O, F>(&self, owner: &Arc<O>, callback: F) -> Subscription
    where
        O: Send + Sync + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let weak_owner = Arc::downgrade(owner);
        let token = {
            let mut registry = self.registry.lock();
            let token = registry.next_token;
            registry.next_token += 1;
            registry.entries.insert(
                token,
                Entry {
                    alive: Box::new(move || weak_owner.strong_count() > 0),
                    callback: Arc::new(callback),
                },
            );
            token
        };

        let registry = Arc::downgrade(&self.registry);
        Subscription {
            cancel: Arc::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.lock().entries.remove(&token);
                }
            }),
        }
    }

    /// Deliver `event` to every currently registered, still-alive subscriber
    /// in subscription order, on the calling thread.
    ///
    /// A stable snapshot of the entry list is taken first, so callbacks may
    /// freely subscribe, unsubscribe, or notify again without corrupting the
    /// registry; entries added during the pass are not visited by it. Entries
    /// whose owner has been dropped are pruned here.
    pub fn notify(&self, event: E) {
        let snapshot: Vec<Callback<E>> = {
            let mut registry = self.registry.lock();
            registry.entries.retain(|_, entry| (entry.alive)());
            registry
                .entries
                .values()
                .map(|entry| Arc::clone(&entry.callback))
                .collect()
        };

        for callback in snapshot {
            callback(&event);
        }
    }

    /// Number of registered entries whose owner is still alive.
    pub fn subscriber_count(&self) -> usize {
        let mut registry = self.registry.lock();
        registry.entries.retain(|_, entry| (entry.alive)());
        registry.entries.len()
    }
}

/// Handle to one registration in an [`EventHub`].
///
/// Calling [`unsubscribe`](Self::unsubscribe) removes the entry immediately
/// and is idempotent. The token does not own the subscriber object and does
/// not unsubscribe on drop.
#[derive(Clone)]
pub struct Subscription {
    cancel: Arc<dyn Fn() + Send + Sync>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        (self.cancel)();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
