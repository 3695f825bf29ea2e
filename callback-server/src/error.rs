//! Error types for the callback server.

use thiserror::Error;

/// Validation failures of an inbound callback.
///
/// These are only ever delivered through [`CallbackEvent::Error`](crate::CallbackEvent::Error);
/// the offending request is consumed and never forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// No upstream stage parsed the query string
    #[error("query parameters are not defined")]
    QueryUndefined,

    /// A notification arrived without the `id` it should be correlated with
    #[error("subscription id was not supplied")]
    MissingId,

    #[error("mode was not supplied")]
    MissingMode,

    #[error("missing required query parameters: {}", .missing.join(", "))]
    MissingParameters {
        mode: String,
        missing: Vec<&'static str>,
    },
}

/// Errors starting or stopping a [`CallbackServer`](crate::CallbackServer)
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("No available port found in range {start}-{end}")]
    NoAvailablePort { start: u16, end: u16 },

    #[error("Server failed to start")]
    Startup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_error_display() {
        assert_eq!(CallbackError::MissingMode.to_string(), "mode was not supplied");
        assert_eq!(
            CallbackError::MissingParameters {
                mode: "denied".into(),
                missing: vec!["hub.topic", "hub.reason"],
            }
            .to_string(),
            "missing required query parameters: hub.topic, hub.reason"
        );
        assert_eq!(
            ServerError::NoAvailablePort { start: 1, end: 2 }.to_string(),
            "No available port found in range 1-2"
        );
    }
}
