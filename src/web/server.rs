//! Web server for folio.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{Config, ServerConfig};
use crate::{FolioError, Result};

use super::handlers::AppState;
use super::router::create_router;

/// HTTP server for the site.
pub struct WebServer {
    addr: SocketAddr,
    state: AppState,
}

impl WebServer {
    /// Create a server from a bind address and prepared state.
    pub fn new(config: &ServerConfig, state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| {
                FolioError::Config(format!(
                    "invalid server address {}:{}: {e}",
                    config.host, config.port
                ))
            })?;

        Ok(Self { addr, state })
    }

    /// Load everything the site needs from the configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let server = config.server.clone();
        let state = AppState::from_config(config)?;
        Self::new(&server, state)
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    async fn bind(&self) -> std::io::Result<(TcpListener, SocketAddr)> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);
        Ok((listener, local_addr))
    }

    /// Run the web server until it fails or the process is stopped.
    pub async fn run(self) -> std::io::Result<()> {
        let (listener, _) = self.bind().await?;
        axum::serve(listener, self.router()).await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// Useful in tests when binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let (listener, local_addr) = self.bind().await?;
        let router = self.router();

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
