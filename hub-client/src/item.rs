//! Subscription items and request modes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lease proposed to the hub when an item does not carry one (one day).
pub const DEFAULT_LEASE_SECONDS: u32 = 86_400;

/// One subscription attempt, as supplied by the caller.
///
/// All fields are optional at the type level: a missing `id`, `hub` or `topic`
/// is reported as a validation error when the item is sent, not when it is
/// built. `lease_seconds` is advisory only; the hub decides the real expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionItem {
    /// Caller-chosen correlation id, echoed back in every callback
    pub id: Option<String>,
    /// Hub endpoint URI
    pub hub: Option<String>,
    /// Resource being subscribed to
    pub topic: Option<String>,
    #[serde(default, rename = "leaseSeconds", alias = "lease_seconds")]
    pub lease_seconds: Option<u32>,
}

impl SubscriptionItem {
    pub fn new(
        id: impl Into<String>,
        hub: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            hub: Some(hub.into()),
            topic: Some(topic.into()),
            lease_seconds: None,
        }
    }

    pub fn with_lease_seconds(mut self, lease_seconds: u32) -> Self {
        self.lease_seconds = Some(lease_seconds);
        self
    }

    /// The id, treating an empty string as absent.
    pub fn id(&self) -> Option<&str> {
        non_empty(&self.id)
    }

    pub fn hub(&self) -> Option<&str> {
        non_empty(&self.hub)
    }

    pub fn topic(&self) -> Option<&str> {
        non_empty(&self.topic)
    }

    /// Names of required fields that are absent or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("id", self.id()),
            ("hub", self.hub()),
            ("topic", self.topic()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.is_none().then_some(name))
        .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// `hub.mode` of an outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Subscribe,
    Unsubscribe,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Subscribe => "subscribe",
            Mode::Unsubscribe => "unsubscribe",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
