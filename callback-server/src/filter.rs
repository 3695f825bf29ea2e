//! warp integration for [`CallbackHandler`].

use bytes::Bytes;
use std::sync::Arc;
use warp::http::{HeaderMap, Method};
use warp::path::FullPath;
use warp::{Filter, Rejection, Reply};

use crate::handler::{CallbackHandler, Disposition};
use crate::request::CallbackRequest;

/// A warp filter serving the handler's callback path.
///
/// Requests for other paths are rejected with `not_found` before their body
/// is read, so a following `.or(...)` sees them unchanged. Requests for the
/// callback path never reject: those left unanswered by the handler are
/// closed with [`CallbackHandler::unanswered_status`].
///
/// # Example
///
/// ```no_run
/// use callback_server::{callback_filter, CallbackHandler};
/// use std::sync::Arc;
/// use url::Url;
/// use warp::Filter;
///
/// # #[tokio::main]
/// # async fn main() {
/// let handler = Arc::new(CallbackHandler::new(&Url::parse("http://sub.example/websub").unwrap()));
/// let health = warp::path("health").map(|| "ok");
///
/// let routes = callback_filter(handler).or(health);
/// warp::serve(routes).run(([0, 0, 0, 0], 8080)).await;
/// # }
/// ```
pub fn callback_filter(
    handler: Arc<CallbackHandler>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let on_callback_path = {
        let handler = handler.clone();
        warp::path::full()
            .and_then(move |path: FullPath| {
                let matched = handler.matches_path(path.as_str());
                async move {
                    if matched {
                        Ok(())
                    } else {
                        Err(warp::reject::not_found())
                    }
                }
            })
            .untuple_one()
    };

    let raw_query = warp::query::raw()
        .or(warp::any().map(String::new))
        .unify();

    on_callback_path
        .and(warp::method())
        .and(warp::path::full())
        .and(raw_query)
        .and(warp::header::headers_cloned())
        .and(warp::body::bytes())
        .and_then(
            move |method: Method, path: FullPath, query: String, headers: HeaderMap, body: Bytes| {
                let handler = handler.clone();
                async move {
                    let request = CallbackRequest::new(method, path.as_str())
                        .with_query_string(&query)
                        .with_headers(headers)
                        .with_body(body);

                    let status = match handler.handle(request) {
                        Disposition::Respond(status) => status,
                        Disposition::PassThrough(_) => return Err(warp::reject::not_found()),
                        Disposition::Unanswered => handler.unanswered_status(),
                    };
                    Ok(warp::reply::with_status(warp::reply(), status))
                }
            },
        )
}
