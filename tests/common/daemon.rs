//! In-process daemon for bridge tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use ticketd::config::Config;
use ticketd::handlers::{Context, Router};
use ticketd::network::{BridgePlatform, Gateway};
use ticketd::services::Platform;
use ticketd::state::{JsonFileStore, SequenceAllocator, TicketRegistry, TicketSettings};

use super::STAFF_ROLE;

/// A daemon listening for bridges on an ephemeral port.
pub struct TestDaemon {
    pub addr: SocketAddr,
    pub registry: Arc<TicketRegistry>,
    pub bridge: Arc<BridgePlatform>,
    pub dir: TempDir,
    task: tokio::task::JoinHandle<()>,
}

impl TestDaemon {
    /// Start a daemon. `extra` is appended to the base config.
    pub async fn start(extra: &str) -> anyhow::Result<Self> {
        Self::start_in(tempfile::tempdir()?, extra).await
    }

    /// Start a daemon whose counter file lives in `dir`.
    pub async fn start_in(dir: TempDir, extra: &str) -> anyhow::Result<Self> {
        let counter = dir.path().join("counter.json");
        let config = Config::parse(&format!(
            r#"
[server]
bridge_listen = "127.0.0.1:0"
http_port = 0
call_timeout_ms = 2000

[tickets]
start_number = 4176
counter_path = "{}"
archive_category = "1426986618618646688"

[roles]
staff = ["{STAFF_ROLE}"]
{extra}
"#,
            counter.display()
        ))?;

        let allocator = Arc::new(
            SequenceAllocator::open(
                JsonFileStore::new(&config.tickets.counter_path),
                config.tickets.start_number,
            )
            .await,
        );
        let bridge = Arc::new(BridgePlatform::new(config.server.call_timeout()));
        let registry = Arc::new(TicketRegistry::new(
            allocator,
            Arc::clone(&bridge) as Arc<dyn Platform>,
            TicketSettings::from_config(&config),
        ));
        let router = Arc::new(Router::new(Context::new(&config, Arc::clone(&registry))?));

        let gateway = Gateway::bind(config.server.bridge_listen, router, Arc::clone(&bridge)).await?;
        let addr = gateway.local_addr()?;
        let task = tokio::spawn(async move {
            let _ = gateway.run().await;
        });

        Ok(Self {
            addr,
            registry,
            bridge,
            dir,
            task,
        })
    }

    /// Stop accepting connections and hand back the data directory.
    pub fn stop(self) -> TempDir {
        self.task.abort();
        self.dir
    }
}
