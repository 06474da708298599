//! Listener registry and the single callback context.

use crate::domain::lookup_job::Reply;
use crate::domain::{LinkListener, LinkResult};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Ordered set of listeners.
///
/// Identity is the `Arc` allocation: adding the same `Arc` twice keeps one
/// entry, removing an unknown listener is a no-op.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<Vec<Arc<dyn LinkListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`; returns false if it was already registered.
    pub fn add(&self, listener: Arc<dyn LinkListener>) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Unregisters `listener`; returns false if it was not registered.
    pub fn remove(&self, listener: &Arc<dyn LinkListener>) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    /// Copies the current listeners so callbacks run without the lock held.
    pub fn snapshot(&self) -> Vec<Arc<dyn LinkListener>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Dispatch {
    result: LinkResult,
    reply: Option<Reply>,
}

/// Sender side of the callback context.
///
/// Every result is handed to one dispatcher task, which calls the listeners
/// in registration order, then completes the request's
/// [`crate::domain::Resolution`].
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Dispatch>,
}

impl Dispatcher {
    /// Spawns the dispatcher task. Must be called inside a Tokio runtime.
    pub fn spawn(registry: Arc<ListenerRegistry>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_dispatch_loop(rx, registry));
        Self { tx }
    }

    pub fn dispatch(&self, result: LinkResult, reply: Option<Reply>) {
        if self.tx.send(Dispatch { result, reply }).is_err() {
            warn!("Dispatcher stopped; dropping link result");
        }
    }
}

async fn run_dispatch_loop(
    mut rx: mpsc::UnboundedReceiver<Dispatch>,
    registry: Arc<ListenerRegistry>,
) {
    while let Some(Dispatch { result, reply }) = rx.recv().await {
        let listeners = registry.snapshot();
        debug!("Dispatching link result to {} listener(s)", listeners.len());

        for listener in listeners {
            let call = panic::catch_unwind(AssertUnwindSafe(|| listener.on_link_result(&result)));
            if call.is_err() {
                error!("Link listener panicked; continuing with remaining listeners");
            }
        }

        if let Some(reply) = reply {
            let _ = reply.send(result);
        }
    }
    debug!("Dispatch queue closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinkData, Resolution};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_listener(counter: Arc<AtomicUsize>) -> Arc<dyn LinkListener> {
        Arc::new(move |_: &LinkResult| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn unrecognized(uri: &str) -> LinkResult {
        LinkResult::Resolved(LinkData::unrecognized(uri))
    }

    #[test]
    fn test_add_is_idempotent() {
        let registry = ListenerRegistry::new();
        let listener = counting_listener(Arc::new(AtomicUsize::new(0)));

        assert!(registry.add(listener.clone()));
        assert!(!registry.add(listener.clone()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_unregistered_is_noop() {
        let registry = ListenerRegistry::new();
        let listener = counting_listener(Arc::new(AtomicUsize::new(0)));

        assert!(!registry.remove(&listener));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_registered() {
        let registry = ListenerRegistry::new();
        let first = counting_listener(Arc::new(AtomicUsize::new(0)));
        let second = counting_listener(Arc::new(AtomicUsize::new(0)));
        registry.add(first.clone());
        registry.add(second.clone());

        assert!(registry.remove(&first));
        let remaining = registry.snapshot();
        assert_eq!(remaining.len(), 1);
        assert!(Arc::ptr_eq(&remaining[0], &second));
    }

    #[tokio::test]
    async fn test_dispatch_calls_listeners_in_order() {
        let registry = Arc::new(ListenerRegistry::new());
        let order = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let order = order.clone();
            registry.add(Arc::new(move |_: &LinkResult| {
                order.lock().unwrap().push(name);
            }));
        }

        let dispatcher = Dispatcher::spawn(registry);
        let (reply, resolution) = Resolution::channel();
        dispatcher.dispatch(unrecognized("https://a.com"), Some(reply));

        assert!(resolution.wait().await.is_some());
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_duplicate_listener_notified_once() {
        let registry = Arc::new(ListenerRegistry::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let listener = counting_listener(counter.clone());
        registry.add(listener.clone());
        registry.add(listener);

        let dispatcher = Dispatcher::spawn(registry);
        let (reply, resolution) = Resolution::channel();
        dispatcher.dispatch(unrecognized("https://a.com"), Some(reply));
        resolution.wait().await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_listener_does_not_stop_dispatch() {
        let registry = Arc::new(ListenerRegistry::new());
        let counter = Arc::new(AtomicUsize::new(0));
        registry.add(Arc::new(|_: &LinkResult| panic!("listener bug")));
        registry.add(counting_listener(counter.clone()));

        let dispatcher = Dispatcher::spawn(registry);
        for uri in ["https://a.com", "https://b.com"] {
            let (reply, resolution) = Resolution::channel();
            dispatcher.dispatch(unrecognized(uri), Some(reply));
            assert!(resolution.wait().await.is_some());
        }

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
