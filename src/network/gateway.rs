//! Gateway - TCP listener for bridge adapters.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{Instrument, error, info, instrument};

use super::bridge::BridgePlatform;
use super::connection::Connection;
use crate::handlers::Router;
use crate::telemetry::spans;

/// Accepts bridge connections and spawns a [`Connection`] for each.
pub struct Gateway {
    listener: TcpListener,
    router: Arc<Router>,
    bridge: Arc<BridgePlatform>,
}

impl Gateway {
    pub async fn bind(
        addr: SocketAddr,
        router: Arc<Router>,
        bridge: Arc<BridgePlatform>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "Bridge listener bound");
        Ok(Self {
            listener,
            router,
            bridge,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    info!(%peer, "Bridge connection accepted");
                    let connection = Connection::new(
                        peer,
                        stream,
                        Arc::clone(&self.router),
                        Arc::clone(&self.bridge),
                    );
                    tokio::spawn(
                        async move {
                            if let Err(e) = connection.run().await {
                                error!(error = %e, "Bridge connection error");
                            }
                            info!("Bridge connection closed");
                        }
                        .instrument(spans::bridge(peer)),
                    );
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept bridge connection");
                }
            }
        }
    }
}
