//! Host-independent view of an inbound HTTP request.

use bytes::Bytes;
use std::collections::HashMap;
use url::form_urlencoded;
use warp::http::header::{HeaderName, HeaderValue, LINK};
use warp::http::{HeaderMap, Method};

use crate::link::{self, Link};

/// An inbound request as handed over by the host pipeline.
///
/// `query` is `None` when no upstream stage parsed the query string, which the
/// classifier treats as a malformed callback. An empty map means "parsed, but
/// no parameters".
#[derive(Debug, Clone)]
pub struct CallbackRequest {
    pub method: Method,
    pub path: String,
    /// Path before any rewrite by the host, preferred over `path` when present
    pub original_path: Option<String>,
    pub query: Option<HashMap<String, String>>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CallbackRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            original_path: None,
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_original_path(mut self, path: impl Into<String>) -> Self {
        self.original_path = Some(path.into());
        self
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = Some(query);
        self
    }

    /// Parse a raw `a=b&c=d` query string. A repeated key keeps its last value.
    pub fn with_query_string(self, raw: &str) -> Self {
        let query = form_urlencoded::parse(raw.as_bytes()).into_owned().collect();
        self.with_query(query)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn effective_path(&self) -> &str {
        self.original_path.as_deref().unwrap_or(&self.path)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.as_ref()?.get(name).map(String::as_str)
    }

    /// All `Link` header entries, across repeated header lines.
    pub fn links(&self) -> Vec<Link> {
        self.headers
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(link::parse)
            .collect()
    }
}
