//! Outbound WebSub requests
//!
//! This crate sends `subscribe` and `unsubscribe` requests to a WebSub hub on
//! behalf of a subscriber. It only reports whether a request was *delivered*;
//! the subscription outcome arrives later at the callback endpoint, correlated
//! through the `id` query parameter embedded in `hub.callback`.
//!
//! # Example
//!
//! ```no_run
//! use hub_client::{HubClient, SubscriptionItem, TransportConfig};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let callback = Url::parse("https://subscriber.example/websub")?;
//!     let client = HubClient::new(callback, &TransportConfig::default())?;
//!
//!     let item = SubscriptionItem::new(
//!         "feed-1",
//!         "https://hub.example/",
//!         "https://blog.example/feed.xml",
//!     );
//!     client.subscribe(item).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod item;
mod request;
mod transport;

pub use client::HubClient;
pub use error::{HubError, TransportError};
pub use item::{Mode, SubscriptionItem, DEFAULT_LEASE_SECONDS};
pub use request::{callback_with_id, HubRequest};
pub use transport::{
    HttpTransport, HubResponse, OutboundRequest, Scheme, Transport, TransportConfig,
    FORM_CONTENT_TYPE,
};
