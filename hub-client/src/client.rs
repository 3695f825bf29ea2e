//! The outbound half of a subscriber.

use std::sync::Arc;
use tokio::task::JoinHandle;
use url::Url;

use crate::error::{HubError, TransportError};
use crate::item::{Mode, SubscriptionItem, DEFAULT_LEASE_SECONDS};
use crate::request::HubRequest;
use crate::transport::{HttpTransport, Scheme, Transport, TransportConfig};

/// Sends subscribe and unsubscribe requests to hubs.
///
/// The client is stateless: it neither remembers nor deduplicates items, and
/// a successful call only means the hub answered. Whether the subscription
/// became active is learned later from the callback endpoint.
#[derive(Clone)]
pub struct HubClient {
    callback_url: Url,
    default_lease_seconds: u32,
    plain: Arc<dyn Transport>,
    secure: Arc<dyn Transport>,
}

impl HubClient {
    /// Create a client using the default `reqwest` transports.
    ///
    /// # Arguments
    ///
    /// * `callback_url` - Registered callback URL; each request carries it with `?id=<item id>`
    /// * `config` - Timeouts shared by the plain and secure transports
    pub fn new(callback_url: Url, config: &TransportConfig) -> Result<Self, TransportError> {
        Ok(Self::with_transports(
            callback_url,
            Arc::new(HttpTransport::plain(config)?),
            Arc::new(HttpTransport::secure(config)?),
        ))
    }

    /// Create a client with caller-provided transports for `http` and `https` hubs.
    pub fn with_transports(
        callback_url: Url,
        plain: Arc<dyn Transport>,
        secure: Arc<dyn Transport>,
    ) -> Self {
        Self {
            callback_url,
            default_lease_seconds: DEFAULT_LEASE_SECONDS,
            plain,
            secure,
        }
    }

    pub fn with_default_lease_seconds(mut self, lease_seconds: u32) -> Self {
        self.default_lease_seconds = lease_seconds;
        self
    }

    pub fn callback_url(&self) -> &Url {
        &self.callback_url
    }

    pub fn default_lease_seconds(&self) -> u32 {
        self.default_lease_seconds
    }

    pub async fn subscribe(&self, item: SubscriptionItem) -> Result<SubscriptionItem, HubError> {
        self.request(item, Mode::Subscribe).await
    }

    pub async fn unsubscribe(&self, item: SubscriptionItem) -> Result<SubscriptionItem, HubError> {
        self.request(item, Mode::Unsubscribe).await
    }

    /// Send one request and wait for the hub to answer.
    ///
    /// Returns the item with its lease defaulted once any HTTP response has
    /// been received. The response status is not interpreted.
    pub async fn request(
        &self,
        item: SubscriptionItem,
        mode: Mode,
    ) -> Result<SubscriptionItem, HubError> {
        let (error, item) = self.execute(Some(item), mode).await;
        match error {
            Some(error) => Err(error),
            None => Ok(item.unwrap_or_default()),
        }
    }

    /// Callback form of [`request`](Self::request).
    ///
    /// The request runs on a spawned tokio task and `on_complete` is invoked
    /// there with `(None, item)` on delivery or `(Some(error), item)` otherwise.
    /// Errors are never raised at the call site. Must be called from within a
    /// tokio runtime.
    pub fn send_subscription_request<F>(
        &self,
        item: Option<SubscriptionItem>,
        mode: Mode,
        on_complete: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Option<HubError>, Option<SubscriptionItem>) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let (error, item) = client.execute(item, mode).await;
            on_complete(error, item);
        })
    }

    async fn execute(
        &self,
        item: Option<SubscriptionItem>,
        mode: Mode,
    ) -> (Option<HubError>, Option<SubscriptionItem>) {
        let request = match HubRequest::build(
            item.as_ref(),
            mode,
            &self.callback_url,
            self.default_lease_seconds,
        ) {
            Ok(request) => request,
            Err(error) => {
                tracing::debug!(%error, id = ?error.id(), "Rejected {} request", mode);
                return (Some(error), item);
            }
        };

        tracing::info!(
            id = request.id(),
            hub = %request.outbound.url,
            callback = %request.callback,
            "Sending {} request to hub",
            mode
        );

        let transport = match request.scheme {
            Scheme::Http => &self.plain,
            Scheme::Https => &self.secure,
        };

        match transport.send(&request.outbound).await {
            Ok(response) => {
                tracing::debug!(
                    id = request.id(),
                    status = response.status,
                    "Hub accepted {} request",
                    mode
                );
                (None, Some(request.item))
            }
            Err(e) => {
                tracing::warn!(id = request.id(), error = %e, "Failed to deliver {} request", mode);
                let error = HubError::Transport {
                    message: e.to_string(),
                    id: request.id().to_string(),
                };
                (Some(error), Some(request.item))
            }
        }
    }
}

impl std::fmt::Debug for HubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubClient")
            .field("callback_url", &self.callback_url.as_str())
            .field("default_lease_seconds", &self.default_lease_seconds)
            .finish_non_exhaustive()
    }
}
