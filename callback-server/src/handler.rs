//! Classification of inbound hub callbacks.
//!
//! [`CallbackHandler`] sits in front of a host's routing pipeline. Requests
//! for any other path are handed back untouched; requests for the callback path
//! are always consumed, classified, and turned into at most one event:
//!
//! | request | event | response |
//! |---|---|---|
//! | `POST ?id=..` with `Link` relations | `Notification` | `200` |
//! | `GET ?id=..&hub.mode=denied&hub.topic=..&hub.reason=..` | `Denied` | `200` |
//! | `GET` with any other `hub.mode` | none | none |
//! | missing query, `id` or `hub.mode` | `Error` | none |

use url::Url;
use warp::http::{Method, StatusCode};

use crate::error::CallbackError;
use crate::event::{CallbackEvent, Denial, Notification};
use crate::link;
use crate::listeners::Listeners;
use crate::request::CallbackRequest;

const DENIED_PARAMS: [&str; 3] = ["id", "hub.topic", "hub.reason"];

/// What the host should do with a request after classification
#[derive(Debug)]
pub enum Disposition {
    /// Not addressed to us; continue with the next stage
    PassThrough(CallbackRequest),
    /// Consumed; answer with this status and an empty body
    Respond(StatusCode),
    /// Consumed; no response was produced
    Unanswered,
}

/// Inbound half of a subscriber, bound to one callback path.
#[derive(Debug, Clone)]
pub struct CallbackHandler {
    callback_path: String,
    listeners: Listeners,
    unanswered_status: StatusCode,
}

impl CallbackHandler {
    /// Handler for the path component of `callback_url`, with a fresh listener registry.
    pub fn new(callback_url: &Url) -> Self {
        Self::with_listeners(callback_url, Listeners::new())
    }

    pub fn with_listeners(callback_url: &Url, listeners: Listeners) -> Self {
        Self {
            callback_path: callback_url.path().to_string(),
            listeners,
            unanswered_status: StatusCode::BAD_REQUEST,
        }
    }

    /// Status a host closes [`Disposition::Unanswered`] exchanges with (default `400`).
    pub fn with_unanswered_status(mut self, status: StatusCode) -> Self {
        self.unanswered_status = status;
        self
    }

    pub fn callback_path(&self) -> &str {
        &self.callback_path
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn unanswered_status(&self) -> StatusCode {
        self.unanswered_status
    }

    pub fn matches_path(&self, path: &str) -> bool {
        path == self.callback_path
    }

    /// Middleware form of [`handle`](Self::handle).
    ///
    /// `proceed` is invoked exactly once with the untouched request when it is
    /// not addressed to the callback path, and never otherwise. Returns the
    /// status to answer with, if any.
    pub fn intercept<F>(&self, request: CallbackRequest, proceed: F) -> Option<StatusCode>
    where
        F: FnOnce(CallbackRequest),
    {
        match self.handle(request) {
            Disposition::PassThrough(request) => {
                proceed(request);
                None
            }
            Disposition::Respond(status) => Some(status),
            Disposition::Unanswered => None,
        }
    }

    /// Classify one inbound request and emit the resulting event.
    pub fn handle(&self, request: CallbackRequest) -> Disposition {
        if !self.matches_path(request.effective_path()) {
            return Disposition::PassThrough(request);
        }

        tracing::debug!(
            method = %request.method,
            path = request.effective_path(),
            "Classifying hub callback"
        );

        if request.query.is_none() {
            return self.reject(CallbackError::QueryUndefined);
        }

        let method = request.method.clone();
        match method {
            Method::POST => self.handle_notification(request),
            Method::GET => self.handle_verification(&request),
            method => {
                tracing::debug!(%method, "Ignoring callback with unsupported method");
                Disposition::Unanswered
            }
        }
    }

    fn handle_notification(&self, request: CallbackRequest) -> Disposition {
        let Some(id) = request.query_param("id").map(str::to_string) else {
            return self.reject(CallbackError::MissingId);
        };

        let links = request.links();
        let hub = link::find(&links, "hub").map(str::to_string);
        let topic = link::find(&links, "self").map(str::to_string);

        tracing::debug!(%id, ?topic, ?hub, "Received content notification");
        self.listeners.emit(&CallbackEvent::Notification(Notification {
            id,
            topic,
            hub,
            request,
        }));

        Disposition::Respond(StatusCode::OK)
    }

    fn handle_verification(&self, request: &CallbackRequest) -> Disposition {
        let Some(mode) = request.query_param("hub.mode") else {
            return self.reject(CallbackError::MissingMode);
        };

        if mode != "denied" {
            // Subscribe/unsubscribe challenge echo is not implemented.
            tracing::debug!(mode, id = ?request.query_param("id"), "Ignoring verification request");
            return Disposition::Unanswered;
        }

        let [id, topic, reason] = DENIED_PARAMS.map(|name| request.query_param(name));
        let (Some(id), Some(topic), Some(reason)) = (id, topic, reason) else {
            let missing = DENIED_PARAMS
                .into_iter()
                .filter(|name| request.query_param(name).is_none())
                .collect();
            return self.reject(CallbackError::MissingParameters {
                mode: mode.to_string(),
                missing,
            });
        };

        tracing::debug!(id, topic, reason, "Subscription denied by hub");
        self.listeners.emit(&CallbackEvent::Denied(Denial {
            id: id.to_string(),
            topic: topic.to_string(),
            reason: reason.to_string(),
        }));

        Disposition::Respond(StatusCode::OK)
    }

    fn reject(&self, error: CallbackError) -> Disposition {
        tracing::debug!(%error, "Rejecting hub callback");
        self.listeners.emit(&CallbackEvent::Error(error));
        Disposition::Unanswered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use std::sync::Arc;
    use warp::http::header::{HeaderValue, LINK};

    const LINKS: &str = r#"<http://hub.example/hub>; rel="hub", <http://blog.example/feed>; rel="self""#;

    fn handler() -> (CallbackHandler, Arc<Mutex<Vec<CallbackEvent>>>) {
        let handler = CallbackHandler::new(&Url::parse("http://sub.example/cb").unwrap());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        handler
            .listeners()
            .register(move |event| sink.lock().push(event.clone()));
        (handler, events)
    }

    fn post(query: &str) -> CallbackRequest {
        CallbackRequest::new(Method::POST, "/cb")
            .with_query_string(query)
            .with_header(LINK, HeaderValue::from_static(LINKS))
            .with_body("<feed/>")
    }

    fn get(query: &str) -> CallbackRequest {
        CallbackRequest::new(Method::GET, "/cb").with_query_string(query)
    }

    #[test]
    fn test_unanswered_status() {
        let (handler, _) = handler();
        assert_eq!(handler.unanswered_status(), StatusCode::BAD_REQUEST);

        let handler = handler.with_unanswered_status(StatusCode::NOT_IMPLEMENTED);
        assert_eq!(handler.unanswered_status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn test_notification() {
        let (handler, events) = handler();

        let disposition = handler.handle(post("id=1"));
        assert!(matches!(disposition, Disposition::Respond(StatusCode::OK)));

        let events = events.lock();
        assert_eq!(events.len(), 1);
        match &events[0] {
            CallbackEvent::Notification(n) => {
                assert_eq!(n.id, "1");
                assert_eq!(n.topic.as_deref(), Some("http://blog.example/feed"));
                assert_eq!(n.hub.as_deref(), Some("http://hub.example/hub"));
                assert_eq!(&n.request.body[..], b"<feed/>");
            }
            other => panic!("Expected notification, got {other:?}"),
        }
    }

    #[test]
    fn test_notification_without_links() {
        let (handler, events) = handler();
        let request = CallbackRequest::new(Method::POST, "/cb").with_query_string("id=5");

        assert!(matches!(handler.handle(request), Disposition::Respond(StatusCode::OK)));
        match &events.lock()[0] {
            CallbackEvent::Notification(n) => {
                assert_eq!(n.id, "5");
                assert_eq!(n.topic, None);
                assert_eq!(n.hub, None);
            }
            other => panic!("Expected notification, got {other:?}"),
        };
    }

    #[test]
    fn test_notification_responds_without_listeners() {
        let handler = CallbackHandler::new(&Url::parse("http://sub.example/cb").unwrap());
        assert!(matches!(
            handler.handle(post("id=1")),
            Disposition::Respond(StatusCode::OK)
        ));
    }

    #[test]
    fn test_notification_missing_id() {
        let (handler, events) = handler();

        assert!(matches!(handler.handle(post("")), Disposition::Unanswered));

        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CallbackEvent::Error(CallbackError::MissingId)));
    }

    #[test]
    fn test_denied() {
        let (handler, events) = handler();

        let disposition = handler.handle(get("id=1&hub.mode=denied&hub.topic=T&hub.reason=R"));
        assert!(matches!(disposition, Disposition::Respond(StatusCode::OK)));

        let events = events.lock();
        assert_eq!(events.len(), 1);
        match &events[0] {
            CallbackEvent::Denied(denial) => assert_eq!(
                denial,
                &Denial {
                    id: "1".into(),
                    topic: "T".into(),
                    reason: "R".into(),
                }
            ),
            other => panic!("Expected denial, got {other:?}"),
        }
    }

    #[test]
    fn test_denied_missing_parameters() {
        let (handler, events) = handler();

        assert!(matches!(
            handler.handle(get("id=1&hub.mode=denied&hub.reason=R")),
            Disposition::Unanswered
        ));

        let events = events.lock();
        assert_eq!(events.len(), 1);
        match &events[0] {
            CallbackEvent::Error(error) => {
                assert_eq!(
                    error,
                    &CallbackError::MissingParameters {
                        mode: "denied".into(),
                        missing: vec!["hub.topic"],
                    }
                );
                assert!(error.to_string().starts_with("missing required query parameters"));
            }
            other => panic!("Expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_get_missing_mode() {
        let (handler, events) = handler();

        assert!(matches!(handler.handle(get("id=1")), Disposition::Unanswered));
        assert!(matches!(
            events.lock()[..],
            [CallbackEvent::Error(CallbackError::MissingMode)]
        ));
    }

    #[test]
    fn test_other_modes_are_ignored() {
        let (handler, events) = handler();

        for mode in ["subscribe", "unsubscribe"] {
            let request = get(&format!("id=1&hub.mode={mode}&hub.topic=T&hub.challenge=abc"));
            assert!(matches!(handler.handle(request), Disposition::Unanswered));
        }
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_query_not_parsed() {
        let (handler, events) = handler();

        let request = CallbackRequest::new(Method::GET, "/cb");
        assert!(matches!(handler.handle(request), Disposition::Unanswered));
        assert!(matches!(
            events.lock()[..],
            [CallbackEvent::Error(CallbackError::QueryUndefined)]
        ));
    }

    #[test]
    fn test_unsupported_method_consumed_silently() {
        let (handler, events) = handler();

        let request = CallbackRequest::new(Method::PUT, "/cb").with_query_string("id=1");
        assert!(matches!(handler.handle(request), Disposition::Unanswered));
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_original_path_is_matched() {
        let (handler, events) = handler();

        let request = get("id=1&hub.mode=denied&hub.topic=T&hub.reason=R")
            .with_original_path("/cb");
        let request = CallbackRequest {
            path: "/rewritten".into(),
            ..request
        };
        assert!(matches!(handler.handle(request), Disposition::Respond(_)));

        let request = CallbackRequest::new(Method::GET, "/cb")
            .with_original_path("/elsewhere")
            .with_query_string("hub.mode=denied");
        assert!(matches!(handler.handle(request), Disposition::PassThrough(_)));

        assert_eq!(events.lock().len(), 1);
    }

    #[test]
    fn test_intercept_proceeds_once_for_other_paths() {
        let (handler, events) = handler();
        let mut proceeded = Vec::new();

        let request = CallbackRequest::new(Method::POST, "/other").with_query_string("id=1");
        let status = handler.intercept(request, |request| proceeded.push(request.path));

        assert_eq!(status, None);
        assert_eq!(proceeded, vec!["/other".to_string()]);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_intercept_never_proceeds_on_callback_path() {
        let (handler, _events) = handler();
        let mut proceeded = 0;

        assert_eq!(
            handler.intercept(post("id=1"), |_| proceeded += 1),
            Some(StatusCode::OK)
        );
        assert_eq!(handler.intercept(get("id=1"), |_| proceeded += 1), None);
        assert_eq!(proceeded, 0);
    }

    proptest! {
        #[test]
        fn prop_foreign_paths_pass_through(
            path in "/[a-z0-9/]{0,20}",
            query in "[a-z=&.]{0,20}",
            post in any::<bool>(),
        ) {
            prop_assume!(path != "/cb");
            let (handler, events) = handler();
            let method = if post { Method::POST } else { Method::GET };
            let request = CallbackRequest::new(method, path).with_query_string(&query);

            let mut proceeded = 0;
            handler.intercept(request, |_| proceeded += 1);

            prop_assert_eq!(proceeded, 1);
            prop_assert!(events.lock().is_empty());
        }

        #[test]
        fn prop_notification_id_matches_query(id in "[A-Za-z0-9 _:-]{1,24}") {
            let (handler, events) = handler();
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("id", &id)
                .finish();

            handler.handle(post(&query));

            let events = events.lock();
            prop_assert_eq!(events.len(), 1);
            prop_assert_eq!(events[0].id(), Some(id.as_str()));
        }
    }
}
