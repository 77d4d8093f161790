// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Identifier handed out by [`ListenerRegistry::register`].
pub type ListenerId = u64;

/// Never returned by a registration; unregistering it is a no-op.
pub const INVALID_LISTENER: ListenerId = 0;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// A thread-safe set of callbacks for events of type `E`.
///
/// Listeners are invoked from whichever thread publishes. The registry is
/// snapshotted under its lock and the lock is released before any callback
/// runs, so a callback may register or unregister listeners (itself
/// included) without deadlocking.
pub struct ListenerRegistry<E> {
    listeners: RwLock<BTreeMap<ListenerId, Callback<E>>>,
    next_id: AtomicU64,
}

impl<E> ListenerRegistry<E> {
    /// Creates an empty registry. The first id handed out is 1.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Adds a listener and returns its id.
    pub fn register<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(listener));
        id
    }

    /// Removes a listener. Returns `false` if the id was unknown.
    pub fn unregister(&self, id: ListenerId) -> bool {
        if id == INVALID_LISTENER {
            return false;
        }
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    /// Removes every listener.
    pub fn clear(&self) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<Callback<E>> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Invokes every listener with `event`, in registration order.
    pub fn notify(&self, event: &E) {
        for listener in self.snapshot() {
            listener(event);
        }
    }

    /// Invokes every listener with each event of the batch.
    ///
    /// A listener sees the whole batch before the next listener is called.
    pub fn notify_all(&self, events: &[E]) {
        if events.is_empty() {
            return;
        }
        let listeners = self.snapshot();
        log::trace!(
            "Dispatching {} event(s) to {} listener(s).",
            events.len(),
            listeners.len()
        );
        for listener in listeners {
            for event in events {
                listener(event);
            }
        }
    }
}

impl<E> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for ListenerRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Loaded(&'static str),
        Dropped,
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let registry = ListenerRegistry::<TestEvent>::new();
        let first = registry.register(|_| {});
        let second = registry.register(|_| {});
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn invalid_id_is_ignored() {
        let registry = ListenerRegistry::<TestEvent>::new();
        registry.register(|_| {});
        assert!(!registry.unregister(INVALID_LISTENER));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn notify_all_delivers_batch_per_listener() {
        let registry = ListenerRegistry::<TestEvent>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = seen.clone();
            registry.register(move |event: &TestEvent| {
                seen.lock().unwrap().push((tag, event.clone()));
            });
        }

        registry.notify_all(&[TestEvent::Loaded("x"), TestEvent::Dropped]);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("a", TestEvent::Loaded("x")),
                ("a", TestEvent::Dropped),
                ("b", TestEvent::Loaded("x")),
                ("b", TestEvent::Dropped),
            ]
        );
    }

    #[test]
    fn listener_can_unregister_itself() {
        let registry = Arc::new(ListenerRegistry::<TestEvent>::new());
        let calls = Arc::new(AtomicU64::new(0));
        let own_id = Arc::new(AtomicU64::new(INVALID_LISTENER));

        let id = {
            let inner = registry.clone();
            let calls = calls.clone();
            let own_id = own_id.clone();
            registry.register(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                inner.unregister(own_id.load(Ordering::SeqCst));
            })
        };
        own_id.store(id, Ordering::SeqCst);

        registry.notify(&TestEvent::Dropped);
        registry.notify(&TestEvent::Dropped);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn notify_from_thread() {
        let registry = Arc::new(ListenerRegistry::<TestEvent>::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = seen.clone();
            registry.register(move |event: &TestEvent| seen.lock().unwrap().push(event.clone()));
        }

        let publisher = registry.clone();
        thread::spawn(move || publisher.notify(&TestEvent::Loaded("threaded")))
            .join()
            .expect("Thread join failed");

        assert_eq!(*seen.lock().unwrap(), vec![TestEvent::Loaded("threaded")]);
    }
}
