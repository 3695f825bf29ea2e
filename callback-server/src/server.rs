//! Standalone HTTP server for hub callbacks.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use warp::http::StatusCode;
use warp::Filter;

use crate::error::ServerError;
use crate::filter::callback_filter;
use crate::handler::CallbackHandler;

/// Where a [`CallbackServer`] listens
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind. Default: 0.0.0.0
    pub bind_ip: IpAddr,
    /// Inclusive range of ports to try, first free port wins. Default: (8080, 8180)
    pub port_range: (u16, u16),
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port_range: (8080, 8180),
        }
    }
}

impl ServerConfig {
    /// Loopback address with an OS-assigned port, for tests and local tools.
    pub fn ephemeral() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port_range: (0, 0),
        }
    }

    pub fn with_port_range(mut self, start: u16, end: u16) -> Self {
        self.port_range = (start, end);
        self
    }
}

/// HTTP server that hosts a [`CallbackHandler`] on its own.
///
/// Use this when the application has no HTTP server of its own; otherwise
/// mount [`callback_filter`] into the existing warp routes.
///
/// # Example
///
/// ```no_run
/// use callback_server::{CallbackHandler, CallbackServer, ServerConfig};
/// use std::sync::Arc;
/// use url::Url;
///
/// #[tokio::main]
/// async fn main() {
///     let callback = Url::parse("http://sub.example:8080/websub").unwrap();
///     let handler = Arc::new(CallbackHandler::new(&callback));
///     let mut events = handler.listeners().channel();
///
///     let server = CallbackServer::start(handler, ServerConfig::default())
///         .await
///         .expect("Failed to start callback server");
///     println!("Listening on {}", server.local_addr());
///
///     while let Some(event) = events.recv().await {
///         println!("{} for {:?}", event.kind(), event.id());
///     }
/// }
/// ```
pub struct CallbackServer {
    local_addr: SocketAddr,
    handler: Arc<CallbackHandler>,
    shutdown_tx: Option<watch::Sender<bool>>,
    server_handle: Option<tokio::task::JoinHandle<()>>,
}

impl CallbackServer {
    /// Bind the first free port in `config.port_range` and start serving.
    pub async fn start(
        handler: Arc<CallbackHandler>,
        config: ServerConfig,
    ) -> Result<Self, ServerError> {
        let (start, end) = config.port_range;
        let routes = callback_filter(handler.clone()).recover(handle_rejection);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut bound = None;
        for port in start..=end {
            let addr = SocketAddr::new(config.bind_ip, port);
            let mut shutdown_rx = shutdown_rx.clone();
            let signal = async move {
                let _ = shutdown_rx.changed().await;
            };

            match warp::serve(routes.clone()).try_bind_with_graceful_shutdown(addr, signal) {
                Ok(server) => {
                    bound = Some(server);
                    break;
                }
                Err(e) => tracing::debug!(%addr, error = %e, "Port unavailable"),
            }
        }

        let Some((local_addr, server)) = bound else {
            return Err(ServerError::NoAvailablePort { start, end });
        };

        let (ready_tx, mut ready_rx) = mpsc::channel::<()>(1);
        let server_handle = tokio::spawn(async move {
            tracing::info!(%local_addr, "Callback server listening");
            // Signal that server is ready
            let _ = ready_tx.send(()).await;
            server.await;
        });

        ready_rx.recv().await.ok_or(ServerError::Startup)?;

        Ok(Self {
            local_addr,
            handler,
            shutdown_tx: Some(shutdown_tx),
            server_handle: Some(server_handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    pub fn handler(&self) -> &Arc<CallbackHandler> {
        &self.handler
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }

        if let Some(handle) = self.server_handle.take() {
            let _ = handle.await;
        }

        tracing::info!(local_addr = %self.local_addr, "Callback server stopped");
        Ok(())
    }
}

/// Convert rejections into HTTP responses.
async fn handle_rejection(
    err: warp::Rejection,
) -> Result<impl warp::Reply, std::convert::Infallible> {
    let code = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        StatusCode::METHOD_NOT_ALLOWED
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok(warp::reply::with_status(warp::reply(), code))
}
