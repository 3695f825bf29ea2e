//! # WebSub SDK - subscriber side of WebSub / PubSubHubbub
//!
//! Sends subscription requests to hubs and classifies the callbacks hubs send
//! back, correlating both through a caller-chosen subscription id:
//!
//! ```rust,no_run
//! use websub_sdk::{Subscriber, SubscriberConfig, SubscriptionItem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), websub_sdk::SdkError> {
//!     let subscriber = Subscriber::new(SubscriberConfig::new("https://sub.example/websub")?)?;
//!
//!     subscriber.on_event(|event| println!("{} for {:?}", event.kind(), event.id()));
//!     subscriber
//!         .subscribe(SubscriptionItem::new("1", "https://hub.example/", "https://blog.example/feed"))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! websub-sdk (Subscriber, SubscriberConfig, logging)
//!     ↓                         ↓
//! hub-client                callback-server
//! (outbound requests)       (inbound classification, warp)
//! ```
//!
//! Nothing is persisted. Which ids are pending, active or denied is for the
//! application to track from the events it receives.

pub use config::{SubscriberConfig, VerifyFn};
pub use error::SdkError;
pub use subscriber::Subscriber;

pub use callback_server::{
    CallbackError, CallbackEvent, CallbackRequest, CallbackServer, Denial, Disposition,
    Notification, ServerConfig,
};
pub use hub_client::{HubError, Mode, SubscriptionItem, TransportConfig};

mod config;
mod error;
pub mod logging;
mod subscriber;
