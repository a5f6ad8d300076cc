//! WebSocket server for the hub.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::chat::ClientRegistry;
use crate::config::ServerConfig;
use crate::exchange::RateSource;
use crate::Result;

use super::router::create_router;
use super::ws::HubState;

/// Hub server bound to a TCP address.
pub struct HubServer<S> {
    listener: TcpListener,
    state: Arc<HubState<S>>,
}

impl<S: RateSource + 'static> HubServer<S> {
    /// Bind the server to the configured address.
    pub async fn bind(config: &ServerConfig, state: HubState<S>) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr()).await?;
        tracing::info!("Hub listening on ws://{}", listener.local_addr()?);

        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Get the client registry.
    pub fn registry(&self) -> Arc<ClientRegistry> {
        Arc::clone(&self.state.registry)
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = create_router(self.state);
        axum::serve(
            self.listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        tracing::info!("Hub stopped");
        Ok(())
    }

    /// Run the server forever.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server in a background task and return its address.
    ///
    /// This is useful for testing when binding to port 0.
    pub fn spawn(self) -> Result<SocketAddr> {
        let addr = self.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = self.run().await {
                tracing::error!("Hub server error: {}", e);
            }
        });
        Ok(addr)
    }
}
