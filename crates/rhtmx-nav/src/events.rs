//! Loading and error listeners
//!
//! Listeners run synchronously on the task that fires the event, in no
//! particular order. A slow listener delays the navigation that fired it.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::NavigationError;

/// A loading-state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingEvent {
    /// Current path when the transition happened
    pub path: String,
    pub loading: bool,
}

pub type LoadingListener = Arc<dyn Fn(&LoadingEvent) + Send + Sync>;
pub type ErrorHandler = Arc<dyn Fn(&NavigationError) + Send + Sync>;

/// Handle returned on registration, used to remove the listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// The two listener registries
#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    loading: RwLock<BTreeMap<ListenerId, LoadingListener>>,
    errors: RwLock<BTreeMap<ListenerId, ErrorHandler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> ListenerId {
        ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn add_loading_listener(&self, listener: LoadingListener) -> ListenerId {
        let id = self.next_id();
        self.loading
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, listener);
        id
    }

    /// Returns false when `id` was not registered
    pub fn remove_loading_listener(&self, id: ListenerId) -> bool {
        self.loading
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    pub fn add_error_handler(&self, handler: ErrorHandler) -> ListenerId {
        let id = self.next_id();
        self.errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, handler);
        id
    }

    pub fn remove_error_handler(&self, id: ListenerId) -> bool {
        self.errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    pub fn emit_loading(&self, event: &LoadingEvent) {
        // Snapshot first so a listener may (un)register without deadlocking
        let listeners: Vec<LoadingListener> = self
            .loading
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    pub fn emit_error(&self, error: &NavigationError) {
        let handlers: Vec<ErrorHandler> = self
            .errors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        if handlers.is_empty() {
            tracing::debug!("No error handler registered for: {}", error);
        }
        for handler in handlers {
            handler(error);
        }
    }

    pub fn loading_listener_count(&self) -> usize {
        self.loading.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn error_handler_count(&self) -> usize {
        self.errors.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("loading_listeners", &self.loading_listener_count())
            .field("error_handlers", &self.error_handler_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_add_fire_remove() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let id = bus.add_loading_listener(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let event = LoadingEvent {
            path: "/".to_string(),
            loading: true,
        };
        bus.emit_loading(&event);
        assert!(bus.remove_loading_listener(id));
        assert!(!bus.remove_loading_listener(id));
        bus.emit_loading(&event);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ids_are_unique_across_registries() {
        let bus = EventBus::new();
        let a = bus.add_loading_listener(Arc::new(|_| {}));
        let b = bus.add_error_handler(Arc::new(|_| {}));
        assert_ne!(a, b);
        assert!(!bus.remove_error_handler(a));
        assert!(bus.remove_error_handler(b));
    }

    #[test]
    fn test_error_handlers_receive_error() {
        let bus = EventBus::new();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.add_error_handler(Arc::new(move |err| {
            sink.lock().unwrap().push(err.to_string());
        }));
        bus.emit_error(&NavigationError::HostUnavailable);

        assert_eq!(*seen.lock().unwrap(), vec!["no host navigator attached".to_string()]);
    }
}
