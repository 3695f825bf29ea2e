//! Inbound side of a WebSub subscriber.
//!
//! This crate receives hub callbacks and turns them into typed events. It holds
//! no subscription state: every request is classified on its own and matched
//! to a subscription only through the `id` query parameter that the hub echoes
//! from `hub.callback`.
//!
//! # Overview
//!
//! - [`CallbackHandler`]: classifies a [`CallbackRequest`] addressed to the
//!   registered callback path into a [`CallbackEvent`] and tells the host what
//!   to do with it through a [`Disposition`].
//! - [`Listeners`]: per-handler registry notified synchronously, in
//!   registration order, of every event including validation errors.
//! - [`callback_filter`]: the handler as a warp filter, for applications that
//!   already run a warp server.
//! - [`CallbackServer`]: a standalone warp server hosting the handler.
//!
//! # Example
//!
//! ```
//! use callback_server::{CallbackEvent, CallbackHandler, CallbackRequest, Disposition};
//! use url::Url;
//! use warp::http::Method;
//!
//! let handler = CallbackHandler::new(&Url::parse("http://sub.example/websub").unwrap());
//! handler.listeners().register(|event: &CallbackEvent| {
//!     println!("{} for subscription {:?}", event.kind(), event.id());
//! });
//!
//! let request = CallbackRequest::new(Method::GET, "/websub")
//!     .with_query_string("id=1&hub.mode=denied&hub.topic=T&hub.reason=R");
//! assert!(matches!(handler.handle(request), Disposition::Respond(_)));
//! ```
//!
//! # Verification
//!
//! `GET` callbacks with `hub.mode` `subscribe` or `unsubscribe` (the
//! challenge handshake) are consumed without an event. The warp adapters close
//! them with [`CallbackHandler::unanswered_status`].

mod error;
mod event;
mod filter;
mod handler;
pub mod link;
mod listeners;
mod request;
mod server;

pub use error::{CallbackError, ServerError};
pub use event::{CallbackEvent, Denial, Notification};
pub use filter::callback_filter;
pub use handler::{CallbackHandler, Disposition};
pub use listeners::Listeners;
pub use request::CallbackRequest;
pub use server::{CallbackServer, ServerConfig};
