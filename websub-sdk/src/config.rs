//! Subscriber configuration
//!
//! A [`SubscriberConfig`] is built once and never changes afterwards. Loading
//! it from files or the environment is left to the application.

use callback_server::CallbackEvent;
use hub_client::{TransportConfig, DEFAULT_LEASE_SECONDS};
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::error::SdkError;

/// Predicate used to accept or reject ambiguous confirmations
pub type VerifyFn = Arc<dyn Fn(&CallbackEvent) -> bool + Send + Sync>;

/// Configuration shared by the outbound and inbound halves of a subscriber
#[derive(Clone)]
pub struct SubscriberConfig {
    /// Registered callback URL. Its path is where hub callbacks are expected;
    /// outbound requests carry it with `?id=<subscription id>`.
    pub callback_url: Url,

    /// Lease proposed when an item has none
    /// Default: 86400 seconds (one day)
    pub lease_seconds: u32,

    /// Timeouts for requests to hubs
    pub transport: TransportConfig,

    verify: VerifyFn,
}

impl SubscriberConfig {
    /// Parse the callback URL and apply defaults for everything else.
    ///
    /// The URL must be absolute with an `http` or `https` scheme.
    pub fn new(callback_url: &str) -> Result<Self, SdkError> {
        let url = Url::parse(callback_url)
            .map_err(|e| SdkError::InvalidCallbackUrl(format!("{callback_url}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SdkError::InvalidCallbackUrl(format!(
                "{callback_url}: scheme must be http or https"
            )));
        }

        Ok(Self {
            callback_url: url,
            lease_seconds: DEFAULT_LEASE_SECONDS,
            transport: TransportConfig::default(),
            verify: Arc::new(|_: &CallbackEvent| true),
        })
    }

    pub fn with_lease_seconds(mut self, lease_seconds: u32) -> Self {
        self.lease_seconds = lease_seconds;
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Replace the verification predicate. The default accepts everything.
    pub fn with_verify<F>(mut self, verify: F) -> Self
    where
        F: Fn(&CallbackEvent) -> bool + Send + Sync + 'static,
    {
        self.verify = Arc::new(verify);
        self
    }

    pub fn verify(&self, event: &CallbackEvent) -> bool {
        (self.verify)(event)
    }

    /// Path component of the callback URL
    pub fn callback_path(&self) -> &str {
        self.callback_url.path()
    }
}

impl fmt::Debug for SubscriberConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberConfig")
            .field("callback_url", &self.callback_url.as_str())
            .field("lease_seconds", &self.lease_seconds)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
