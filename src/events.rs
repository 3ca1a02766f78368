//! Ordered listener registry shared by the media element and the input surface.
//!
//! Handlers are invoked in the order they were subscribed. `emit` clones the
//! handler list before calling out, so a handler may subscribe, unsubscribe or
//! call back into whatever is emitting without deadlocking on the registry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Opaque handle returned by `Listeners::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// A list of typed callbacks for one event stream
pub struct Listeners<E> {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(ListenerId, Handler<E>)>>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Listeners {
            next_id: AtomicU64::new(1),
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Register a handler; it fires after every handler registered before it.
    pub fn subscribe<F>(&self, handler: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut lock) = self.handlers.lock() {
            lock.push((id, Arc::new(handler)));
        }
        id
    }

    /// Remove a handler. Returns false if the id was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        match self.handlers.lock() {
            Ok(mut lock) => {
                let before = lock.len();
                lock.retain(|(lid, _)| *lid != id);
                lock.len() != before
            }
            Err(_) => false,
        }
    }

    /// Deliver `event` to every handler in registration order
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Handler<E>> = match self.handlers.lock() {
            Ok(lock) => lock.iter().map(|(_, h)| h.clone()).collect(),
            Err(_) => return,
        };
        for handler in snapshot {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handlers_fire_in_registration_order() {
        let l: Listeners<u32> = Listeners::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let seen = seen.clone();
            l.subscribe(move |v: &u32| seen.lock().unwrap().push(format!("{}{}", tag, v)));
        }
        l.emit(&7);
        assert_eq!(*seen.lock().unwrap(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_handler() {
        let l: Listeners<()> = Listeners::new();
        let count = Arc::new(AtomicU64::new(0));
        let c1 = count.clone();
        let first = l.subscribe(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let c2 = count.clone();
        l.subscribe(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        });
        assert!(l.unsubscribe(first));
        assert!(!l.unsubscribe(first));
        l.emit(&());
        assert_eq!(count.load(Ordering::SeqCst), 10);
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn handler_may_subscribe_during_emit() {
        let l: Arc<Listeners<()>> = Arc::new(Listeners::new());
        let inner = l.clone();
        l.subscribe(move |_| {
            inner.subscribe(|_| {});
        });
        l.emit(&());
        assert_eq!(l.len(), 2);
    }
}
