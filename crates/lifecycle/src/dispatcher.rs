//! Named-event notification.
//!
//! Listeners subscribe to an event name such as `"updating: project"`. A
//! dispatch runs them in registration order and stops at the first error.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;

/// A listener for events carrying an `E`.
pub type Listener<E> = Arc<dyn Fn(&E) -> Result<()> + Send + Sync>;

/// Something listeners can subscribe to by event name.
pub trait Notifier<E> {
    /// Subscribes `listener` to `event`.
    fn listen(&self, event: &str, listener: Listener<E>);
}

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

/// In-process [`Notifier`].
///
/// Registration takes a write lock; dispatch snapshots the listeners and
/// releases the lock before running them, so a listener may subscribe
/// further listeners.
pub struct EventDispatcher<E> {
    listeners: parking_lot::RwLock<IndexMap<String, Vec<Listener<E>>>>,
}

impl<E> EventDispatcher<E> {
    /// Creates a dispatcher with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: parking_lot::RwLock::new(IndexMap::new()),
        }
    }

    /// Returns true if anything listens to `event`.
    pub fn has_listeners(&self, event: &str) -> bool {
        self.listeners.read().get(event).is_some_and(|l| !l.is_empty())
    }

    /// Names of the events with listeners, in registration order.
    pub fn events(&self) -> Vec<String> {
        self.listeners.read().keys().cloned().collect()
    }

    /// Removes every listener of `event`.
    pub fn forget(&self, event: &str) {
        self.listeners.write().shift_remove(event);
    }

    /// Runs the listeners of `event` against `payload`.
    ///
    /// Short-circuits on the first listener error and returns it.
    pub fn dispatch(&self, event: &str, payload: &E) -> Result<()> {
        for listener in self.snapshot(event) {
            if let Err(err) = listener(payload) {
                debug!(event, error = %err, "listener halted dispatch");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Like [`dispatch`](Self::dispatch), but reports a halt as `false`
    /// instead of an error.
    pub fn until(&self, event: &str, payload: &E) -> bool {
        self.dispatch(event, payload).is_ok()
    }

    fn snapshot(&self, event: &str) -> Vec<Listener<E>> {
        self.listeners.read().get(event).cloned().unwrap_or_default()
    }
}

impl<E> Notifier<E> for EventDispatcher<E> {
    fn listen(&self, event: &str, listener: Listener<E>) {
        self.listeners
            .write()
            .entry(event.to_owned())
            .or_default()
            .push(listener);
        debug!(event, "listener registered");
    }
}

impl<E> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventDispatcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.listeners.read();
        let count: usize = guard.values().map(Vec::len).sum();
        f.debug_struct("EventDispatcher")
            .field("events", &guard.len())
            .field("listener_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Listener<u32> {
        let log = Arc::clone(log);
        Arc::new(move |n: &u32| -> Result<()> {
            log.lock().push(format!("{tag}:{n}"));
            Ok(())
        })
    }

    #[test]
    fn dispatch_runs_listeners_in_registration_order() {
        let dispatcher = EventDispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher.listen("saving: counter", recorder(&log, "a"));
        dispatcher.listen("saving: counter", recorder(&log, "b"));
        dispatcher.listen("deleting: counter", recorder(&log, "c"));

        dispatcher.dispatch("saving: counter", &7).unwrap();

        assert_eq!(*log.lock(), vec!["a:7".to_owned(), "b:7".to_owned()]);
        assert_eq!(dispatcher.events(), vec!["saving: counter", "deleting: counter"]);
    }

    #[test]
    fn first_error_stops_the_dispatch() {
        let dispatcher = EventDispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher.listen("saving: counter", recorder(&log, "a"));
        dispatcher.listen(
            "saving: counter",
            Arc::new(|_: &u32| -> Result<()> { Err(Error::rejected("saving: counter", "frozen")) }),
        );
        dispatcher.listen("saving: counter", recorder(&log, "c"));

        let err = dispatcher.dispatch("saving: counter", &1).unwrap_err();

        assert!(matches!(err, Error::Rejected { ref reason, .. } if reason == "frozen"));
        assert_eq!(*log.lock(), vec!["a:1".to_owned()]);
        assert!(!dispatcher.until("saving: counter", &1));
    }

    #[test]
    fn events_without_listeners_pass() {
        let dispatcher = EventDispatcher::<u32>::new();

        assert!(!dispatcher.has_listeners("creating: counter"));
        assert!(dispatcher.dispatch("creating: counter", &0).is_ok());
        assert!(dispatcher.until("creating: counter", &0));
    }

    #[test]
    fn forget_drops_listeners() {
        let dispatcher = EventDispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher.listen("saving: counter", recorder(&log, "a"));

        dispatcher.forget("saving: counter");
        dispatcher.dispatch("saving: counter", &3).unwrap();

        assert!(log.lock().is_empty());
        assert!(!dispatcher.has_listeners("saving: counter"));
    }
}
