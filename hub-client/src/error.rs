//! Error types for the hub client

use thiserror::Error;

/// Errors reported for a single subscribe/unsubscribe call.
///
/// Every variant carries the subscription id when the caller supplied one, so a
/// completion handler can correlate the failure without holding on to the item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// A required field was absent or empty
    #[error("{reason}")]
    Validation {
        reason: &'static str,
        id: Option<String>,
        /// Names of the missing fields, in declaration order
        missing: Vec<&'static str>,
    },

    /// The hub URI is not `http` or `https`
    #[error("protocol of hub is not supported: {hub}")]
    UnsupportedTransport { id: String, hub: String },

    /// The request never produced a response
    #[error("transport error: {message}")]
    Transport { message: String, id: String },
}

impl HubError {
    pub(crate) fn item_not_supplied() -> Self {
        HubError::Validation {
            reason: "item not supplied",
            id: None,
            missing: Vec::new(),
        }
    }

    pub(crate) fn required_params(id: Option<String>, missing: Vec<&'static str>) -> Self {
        HubError::Validation {
            reason: "required params not supplied",
            id,
            missing,
        }
    }

    /// Subscription id this error is tagged with, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            HubError::Validation { id, .. } => id.as_deref(),
            HubError::UnsupportedTransport { id, .. } | HubError::Transport { id, .. } => {
                Some(id)
            }
        }
    }

    /// True for errors raised before any request was issued.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            HubError::Validation { .. } | HubError::UnsupportedTransport { .. }
        )
    }
}

/// Errors raised by a [`Transport`](crate::Transport) implementation
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Connection, DNS, TLS or timeout failure
    #[error("{0}")]
    Request(String),
}
