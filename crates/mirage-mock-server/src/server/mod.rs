//! Embedded server lifecycle around the resolution core.
//!
//! [`MockServer::start`] binds a local port, spawns an accept loop, and
//! serves each connection on its own task; every request goes through
//! [`crate::resolver::ServerConfig::resolve`]. Shutdown is signalled over a
//! broadcast channel, and dropping the server sends the signal too, so a
//! test that forgets to stop still releases the port.

mod handler;
mod tls;

pub use tls::TlsContext;

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, error, info};

use crate::resolver::ServerConfig;

/// Failure starting or stopping the embedded server. Unlike resolution
/// failures, these are surfaced to the embedding test as fatal: a server
/// that cannot start invalidates the test run.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("failed to bind port {0}: {1}")]
    Bind(u16, String),
    #[error("invalid TLS certificate material: {0}")]
    InvalidCertificate(String),
}

/// Running mock server instance.
pub struct MockServer {
    local_addr: SocketAddr,
    shutdown_tx: broadcast::Sender<()>,
}

impl MockServer {
    /// Start serving plain HTTP on `127.0.0.1:config.port`.
    pub async fn start(config: ServerConfig) -> Result<Self, LifecycleError> {
        Self::serve(config, None).await
    }

    /// Start serving HTTPS with the given TLS context.
    pub async fn start_tls(config: ServerConfig, tls: TlsContext) -> Result<Self, LifecycleError> {
        Self::serve(config, Some(tls.into_acceptor())).await
    }

    async fn serve(
        config: ServerConfig,
        tls: Option<TlsAcceptor>,
    ) -> Result<Self, LifecycleError> {
        let port = config.port;
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|e| LifecycleError::Bind(port, e.to_string()))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| LifecycleError::Bind(port, e.to_string()))?;

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let config = Arc::new(config);

        info!("mock server listening on {}", local_addr);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _addr)) => {
                                let config = Arc::clone(&config);
                                let tls = tls.clone();
                                tokio::spawn(async move {
                                    match tls {
                                        Some(acceptor) => match acceptor.accept(stream).await {
                                            Ok(tls_stream) => serve_connection(tls_stream, config).await,
                                            Err(e) => debug!("TLS handshake failed: {}", e),
                                        },
                                        None => serve_connection(stream, config).await,
                                    }
                                });
                            }
                            Err(e) => {
                                error!("accept error on {}: {}", local_addr, e);
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("mock server on {} shutting down", local_addr);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            local_addr,
            shutdown_tx,
        })
    }

    /// Port the server is bound to; useful with port 0 configurations.
    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Bound socket address.
    pub fn addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections. In-flight connections finish on their own
    /// tasks.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
    }
}

async fn serve_connection<S>(stream: S, config: Arc<ServerConfig>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let io = TokioIo::new(stream);
    let service = service_fn(move |req| {
        let config = Arc::clone(&config);
        async move { handler::handle_request(req, config).await }
    });
    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
        debug!("connection error: {}", e);
    }
}
