//! Log events and the dispatcher seam
//!
//! The facade publishes a [`LogEvent`] for every record it writes when an
//! [`EventDispatcher`] is attached. Dispatchers come in different shapes, so
//! the trait offers two publish entry points (`emit`, `dispatch`) and two
//! subscribe entry points (`on`, `listen`). Each defaults to reporting that
//! it is unsupported; an implementation overrides whichever ones it offers
//! and the facade tries the primary one first, then the alternate.

use crate::core::{LogContext, LogLevel};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Name under which log events are published and subscribed to
pub const LOG_EVENT: &str = "application.log";

/// Payload published for each record written through the facade
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub context: LogContext,
}

/// Callback registered for log events
pub type Listener = Arc<dyn Fn(&LogEvent) + Send + Sync>;

/// Outcome of a publish attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Unsupported,
}

pub trait EventDispatcher: Send + Sync {
    /// Primary publish entry point
    fn emit(&self, _event: &LogEvent) -> Delivery {
        Delivery::Unsupported
    }

    /// Alternate publish entry point
    fn dispatch(&self, _event: &LogEvent) -> Delivery {
        Delivery::Unsupported
    }

    /// Primary subscribe entry point. Hands the listener back when
    /// unsupported so the alternate can be tried.
    fn on(&self, _event: &str, listener: Listener) -> Result<(), Listener> {
        Err(listener)
    }

    /// Alternate subscribe entry point
    fn listen(&self, _event: &str, listener: Listener) -> Result<(), Listener> {
        Err(listener)
    }
}

/// Publish through `emit`, else `dispatch`, else not at all
pub fn publish(dispatcher: &dyn EventDispatcher, event: &LogEvent) -> Delivery {
    match dispatcher.emit(event) {
        Delivery::Delivered => Delivery::Delivered,
        Delivery::Unsupported => dispatcher.dispatch(event),
    }
}

/// Subscribe through `on`, else `listen`; returns whether either accepted
pub fn subscribe(dispatcher: &dyn EventDispatcher, event: &str, listener: Listener) -> bool {
    match dispatcher.on(event, listener) {
        Ok(()) => true,
        Err(listener) => dispatcher.listen(event, listener).is_ok(),
    }
}

/// In-process dispatcher: listeners are called synchronously, in
/// registration order, on the publishing thread.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.read().get(event).map_or(0, Vec::len)
    }
}

impl EventDispatcher for EventBus {
    fn emit(&self, event: &LogEvent) -> Delivery {
        // Clone the list so listeners may subscribe while being called
        let listeners = self.listeners.read().get(LOG_EVENT).cloned();
        for listener in listeners.unwrap_or_default() {
            listener(event);
        }
        Delivery::Delivered
    }

    fn on(&self, event: &str, listener: Listener) -> Result<(), Listener> {
        self.listeners
            .write()
            .entry(event.to_string())
            .or_default()
            .push(listener);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn event(message: &str) -> LogEvent {
        LogEvent {
            level: LogLevel::Info,
            message: message.to_string(),
            context: LogContext::new(),
        }
    }

    struct DispatchOnly(Mutex<Vec<String>>);

    impl EventDispatcher for DispatchOnly {
        fn dispatch(&self, event: &LogEvent) -> Delivery {
            self.0.lock().push(event.message.clone());
            Delivery::Delivered
        }

        fn listen(&self, event: &str, _listener: Listener) -> Result<(), Listener> {
            self.0.lock().push(format!("listen:{}", event));
            Ok(())
        }
    }

    struct Inert;

    impl EventDispatcher for Inert {}

    #[test]
    fn test_publish_falls_back_to_dispatch() {
        let dispatcher = DispatchOnly(Mutex::new(Vec::new()));
        assert_eq!(publish(&dispatcher, &event("hi")), Delivery::Delivered);
        assert_eq!(*dispatcher.0.lock(), vec!["hi".to_string()]);
    }

    #[test]
    fn test_subscribe_falls_back_to_listen() {
        let dispatcher = DispatchOnly(Mutex::new(Vec::new()));
        assert!(subscribe(&dispatcher, LOG_EVENT, Arc::new(|_| {})));
        assert_eq!(*dispatcher.0.lock(), vec![format!("listen:{}", LOG_EVENT)]);
    }

    #[test]
    fn test_inert_dispatcher_is_skipped() {
        assert_eq!(publish(&Inert, &event("hi")), Delivery::Unsupported);
        assert!(!subscribe(&Inert, LOG_EVENT, Arc::new(|_| {})));
    }

    #[test]
    fn test_event_bus_delivers_to_listeners_in_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = Arc::clone(&seen);
            let listener: Listener =
                Arc::new(move |e: &LogEvent| seen.lock().push(format!("{}:{}", tag, e.message)));
            assert!(subscribe(&bus, LOG_EVENT, listener));
        }

        assert_eq!(bus.listener_count(LOG_EVENT), 2);
        assert_eq!(publish(&bus, &event("x")), Delivery::Delivered);
        assert_eq!(*seen.lock(), vec!["a:x".to_string(), "b:x".to_string()]);
    }
}
