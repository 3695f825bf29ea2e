//! Transports used to deliver requests to a hub.
//!
//! A hub URI is dispatched to one of two [`Transport`] implementations based on
//! its [`Scheme`]. The default [`HttpTransport`] is backed by `reqwest`; the
//! secure instance refuses to talk to anything but `https`.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::error::TransportError;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Transport scheme of a hub URI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Returns `None` for anything other than `http` / `https`.
    pub fn from_url(url: &Url) -> Option<Self> {
        match url.scheme() {
            "http" => Some(Scheme::Http),
            "https" => Some(Scheme::Https),
            _ => None,
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, Scheme::Https)
    }
}

/// A form-encoded request ready to be sent to a hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: Url,
    pub content_type: &'static str,
    pub body: String,
}

/// What came back from the hub. The status is not interpreted by the protocol
/// layer: any response counts as delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubResponse {
    pub status: u16,
}

/// Delivers an outbound request and reports whether a response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<HubResponse, TransportError>;
}

/// Timeouts and identification for the default transports
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Default: 5 seconds
    pub connect_timeout: Duration,
    /// Total time allowed for one request. Default: 30 seconds
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("websub-hub-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport for `http` hubs.
    pub fn plain(config: &TransportConfig) -> Result<Self, TransportError> {
        Self::build(config, false)
    }

    /// Transport for `https` hubs. Refuses plain-text URLs, including redirects to one.
    pub fn secure(config: &TransportConfig) -> Result<Self, TransportError> {
        Self::build(config, true)
    }

    fn build(config: &TransportConfig, https_only: bool) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .https_only(https_only)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<HubResponse, TransportError> {
        let response = self
            .client
            .post(request.url.clone())
            .header(reqwest::header::CONTENT_TYPE, request.content_type)
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(HubResponse {
            status: response.status().as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_from_url() {
        let http = Url::parse("http://hub.example/hub").unwrap();
        let https = Url::parse("https://hub.example/hub").unwrap();
        let ftp = Url::parse("ftp://hub.example/hub").unwrap();

        assert_eq!(Scheme::from_url(&http), Some(Scheme::Http));
        assert_eq!(Scheme::from_url(&https), Some(Scheme::Https));
        assert_eq!(Scheme::from_url(&ftp), None);
        assert!(Scheme::Https.is_secure());
    }

    #[test]
    fn test_transport_creation() {
        let config = TransportConfig::default();
        assert!(HttpTransport::plain(&config).is_ok());
        assert!(HttpTransport::secure(&config).is_ok());
    }

    #[tokio::test]
    async fn test_secure_transport_rejects_plain_url() {
        let transport = HttpTransport::secure(&TransportConfig::default()).unwrap();
        let request = OutboundRequest {
            url: Url::parse("http://127.0.0.1:9/hub").unwrap(),
            content_type: FORM_CONTENT_TYPE,
            body: String::new(),
        };

        let result = transport.send(&request).await;
        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
