//! Subscriber - main entry point for the SDK

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use callback_server::{
    callback_filter, CallbackEvent, CallbackHandler, CallbackServer, ServerConfig,
};
use hub_client::{HubClient, HubError, Mode, SubscriptionItem, Transport};
use warp::{Filter, Rejection, Reply};

use crate::config::SubscriberConfig;
use crate::error::SdkError;

/// A WebSub subscriber: one configuration, one hub client, one callback handler.
///
/// The subscriber tracks nothing. Requests to hubs are fire-and-forget and
/// their outcome arrives later as a [`CallbackEvent`] carrying the same id as
/// the [`SubscriptionItem`] that was sent.
///
/// # Example
///
/// ```rust,no_run
/// use websub_sdk::{CallbackEvent, ServerConfig, Subscriber, SubscriberConfig, SubscriptionItem};
///
/// #[tokio::main]
/// async fn main() -> Result<(), websub_sdk::SdkError> {
///     let config = SubscriberConfig::new("https://sub.example/websub")?;
///     let subscriber = Subscriber::new(config)?;
///
///     let mut events = subscriber.events();
///     let _server = subscriber.serve(ServerConfig::default()).await?;
///
///     subscriber
///         .subscribe(SubscriptionItem::new(
///             "blog",
///             "https://hub.example/",
///             "https://blog.example/feed.xml",
///         ))
///         .await?;
///
///     while let Some(event) = events.recv().await {
///         match event {
///             CallbackEvent::Notification(n) => println!("new content for {}", n.id),
///             CallbackEvent::Denied(d) => println!("{} denied: {}", d.id, d.reason),
///             CallbackEvent::Error(e) => eprintln!("bad callback: {e}"),
///         }
///     }
///     Ok(())
/// }
/// ```
pub struct Subscriber {
    config: SubscriberConfig,
    hub: HubClient,
    handler: Arc<CallbackHandler>,
}

impl Subscriber {
    /// Create a subscriber using the default `reqwest` transports.
    pub fn new(config: SubscriberConfig) -> Result<Self, SdkError> {
        let hub = HubClient::new(config.callback_url.clone(), &config.transport)?;
        Ok(Self::from_parts(config, hub))
    }

    /// Create a subscriber with caller-provided transports for `http` and `https` hubs.
    pub fn with_transports(
        config: SubscriberConfig,
        plain: Arc<dyn Transport>,
        secure: Arc<dyn Transport>,
    ) -> Self {
        let hub = HubClient::with_transports(config.callback_url.clone(), plain, secure);
        Self::from_parts(config, hub)
    }

    fn from_parts(config: SubscriberConfig, hub: HubClient) -> Self {
        let hub = hub.with_default_lease_seconds(config.lease_seconds);
        let handler = Arc::new(CallbackHandler::new(&config.callback_url));

        tracing::debug!(
            callback_url = %config.callback_url,
            lease_seconds = config.lease_seconds,
            "Subscriber created"
        );

        Self {
            config,
            hub,
            handler,
        }
    }

    pub fn config(&self) -> &SubscriberConfig {
        &self.config
    }

    pub fn hub_client(&self) -> &HubClient {
        &self.hub
    }

    pub async fn subscribe(&self, item: SubscriptionItem) -> Result<SubscriptionItem, SdkError> {
        Ok(self.hub.subscribe(item).await?)
    }

    pub async fn unsubscribe(&self, item: SubscriptionItem) -> Result<SubscriptionItem, SdkError> {
        Ok(self.hub.unsubscribe(item).await?)
    }

    /// Callback form of [`subscribe`](Self::subscribe) / [`unsubscribe`](Self::unsubscribe).
    ///
    /// See [`HubClient::send_subscription_request`].
    pub fn send_subscription_request<F>(
        &self,
        item: Option<SubscriptionItem>,
        mode: Mode,
        on_complete: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Option<HubError>, Option<SubscriptionItem>) + Send + 'static,
    {
        self.hub.send_subscription_request(item, mode, on_complete)
    }

    /// Register a listener for every callback event.
    pub fn on_event<F>(&self, listener: F)
    where
        F: Fn(&CallbackEvent) + Send + Sync + 'static,
    {
        self.handler.listeners().register(listener);
    }

    /// Stream of every callback event from now on.
    pub fn events(&self) -> mpsc::UnboundedReceiver<CallbackEvent> {
        self.handler.listeners().channel()
    }

    pub fn handler(&self) -> &Arc<CallbackHandler> {
        &self.handler
    }

    /// The callback handler as a warp filter, to mount into existing routes.
    pub fn filter(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        callback_filter(self.handler.clone())
    }

    /// Start a standalone callback server for this subscriber.
    pub async fn serve(&self, server_config: ServerConfig) -> Result<CallbackServer, SdkError> {
        Ok(CallbackServer::start(self.handler.clone(), server_config).await?)
    }

    /// Apply the configured verification predicate.
    pub fn verify(&self, event: &CallbackEvent) -> bool {
        self.config.verify(event)
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("config", &self.config)
            .field("callback_path", &self.handler.callback_path())
            .finish()
    }
}
