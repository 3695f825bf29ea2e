//! Events produced by classifying inbound callbacks.

use crate::error::CallbackError;
use crate::request::CallbackRequest;

/// The hub refused or revoked a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub id: String,
    pub topic: String,
    pub reason: String,
}

/// The hub delivered content for a topic.
///
/// `topic` and `hub` come from the `rel="self"` and `rel="hub"` links and are
/// `None` when the hub omitted them. The payload is left untouched in `request`.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: String,
    pub topic: Option<String>,
    pub hub: Option<String>,
    pub request: CallbackRequest,
}

/// Everything a listener can observe
#[derive(Debug, Clone)]
pub enum CallbackEvent {
    Error(CallbackError),
    Notification(Notification),
    Denied(Denial),
}

impl CallbackEvent {
    /// Event name: `error`, `notification` or `denied`.
    pub fn kind(&self) -> &'static str {
        match self {
            CallbackEvent::Error(_) => "error",
            CallbackEvent::Notification(_) => "notification",
            CallbackEvent::Denied(_) => "denied",
        }
    }

    /// Subscription id the event belongs to, `None` for errors.
    pub fn id(&self) -> Option<&str> {
        match self {
            CallbackEvent::Error(_) => None,
            CallbackEvent::Notification(n) => Some(&n.id),
            CallbackEvent::Denied(d) => Some(&d.id),
        }
    }
}
