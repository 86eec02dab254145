//! ticketd - support-ticket lifecycle daemon.

use std::sync::Arc;
use ticketd::config::{self, Config};
use ticketd::handlers::{Context, Router};
use ticketd::network::{BridgePlatform, Gateway};
use ticketd::state::{JsonFileStore, SequenceAllocator, TicketRegistry, TicketSettings};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {config_path}", errors.len());
    }

    info!(
        bridge = %config.server.bridge_listen,
        counter = %config.tickets.counter_path,
        "Starting ticketd"
    );

    ticketd::metrics::init();

    let allocator = Arc::new(
        SequenceAllocator::open(
            JsonFileStore::new(&config.tickets.counter_path),
            config.tickets.start_number,
        )
        .await,
    );
    info!(last_issued = allocator.last_issued().await, "Sequence counter loaded");

    let bridge = Arc::new(BridgePlatform::new(config.server.call_timeout()));
    let registry = Arc::new(TicketRegistry::new(
        allocator,
        Arc::clone(&bridge) as Arc<dyn ticketd::services::Platform>,
        TicketSettings::from_config(&config),
    ));
    let router = Arc::new(Router::new(Context::new(&config, Arc::clone(&registry))?));

    if config.server.http_port != 0 {
        tokio::spawn(ticketd::http::run_http_server(config.server.http_port));
    }

    let gateway = Gateway::bind(config.server.bridge_listen, router, bridge).await?;

    tokio::select! {
        result = gateway.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!(tickets = registry.len(), "Shutting down, draining side effects");
            registry.drain().await;
        }
    }

    Ok(())
}
