//! Event delivery for classified callbacks.
//!
//! This module provides [`Listeners`], a per-handler registry of callbacks
//! that receive every [`CallbackEvent`] synchronously, in registration order.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::event::CallbackEvent;

type Listener = Arc<dyn Fn(&CallbackEvent) + Send + Sync>;

/// Fan-out of callback events to any number of listeners.
///
/// Cloning a `Listeners` yields a handle to the same registry.
#[derive(Clone, Default)]
pub struct Listeners {
    listeners: Arc<RwLock<Vec<Listener>>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    ///
    /// # Example
    ///
    /// ```
    /// use callback_server::{CallbackEvent, Listeners};
    ///
    /// let listeners = Listeners::new();
    /// listeners.register(|event: &CallbackEvent| {
    ///     if let CallbackEvent::Denied(denial) = event {
    ///         println!("{} denied: {}", denial.id, denial.reason);
    ///     }
    /// });
    /// assert_eq!(listeners.len(), 1);
    /// ```
    pub fn register<F>(&self, listener: F)
    where
        F: Fn(&CallbackEvent) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    /// Register a listener that forwards every event into a channel.
    ///
    /// # Example
    ///
    /// ```
    /// # use callback_server::Listeners;
    /// # #[tokio::main]
    /// # async fn main() {
    /// let listeners = Listeners::new();
    /// let mut rx = listeners.channel();
    /// # drop(listeners);
    /// # assert!(rx.recv().await.is_none());
    /// # }
    /// ```
    pub fn channel(&self) -> mpsc::UnboundedReceiver<CallbackEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.register(move |event| {
            // Ignore errors if receiver is dropped
            let _ = tx.send(event.clone());
        });
        rx
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every listener and return how many were invoked.
    ///
    /// The registry lock is released before any listener runs, so a listener
    /// may register further listeners. Those only see later events.
    pub fn emit(&self, event: &CallbackEvent) -> usize {
        let listeners: Vec<Listener> = self.listeners.read().clone();

        if listeners.is_empty() {
            if let CallbackEvent::Error(error) = event {
                tracing::debug!(%error, "Dropping callback error, no listener registered");
            }
            return 0;
        }

        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}
