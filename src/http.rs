//! HTTP server for the keepalive and Prometheus endpoints.
//!
//! `/` answers a fixed string for uptime probes; `/metrics` serves
//! Prometheus text.

use axum::{Router, routing::get};
use std::net::SocketAddr;

const KEEPALIVE_BODY: &str = "Ticket daemon is alive!";

async fn keepalive_handler() -> &'static str {
    KEEPALIVE_BODY
}

/// Handler for GET /metrics - returns Prometheus metrics in text format.
async fn metrics_handler() -> String {
    crate::metrics::gather_metrics()
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(keepalive_handler))
        .route("/metrics", get(metrics_handler))
}

/// Run the HTTP server on `0.0.0.0:port` until it fails.
pub async fn run_http_server(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind HTTP server");
            return;
        }
    };
    tracing::info!(%addr, "HTTP server listening");

    if let Err(e) = axum::serve(listener, router()).await {
        tracing::error!(error = %e, "HTTP server error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_keepalive_and_metrics() {
        crate::metrics::init();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router()).await;
        });

        let body = get_body(addr, "/").await;
        assert!(body.ends_with(KEEPALIVE_BODY));
        let metrics = get_body(addr, "/metrics").await;
        assert!(metrics.contains("200 OK"));
    }

    async fn get_body(addr: SocketAddr, path: &str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }
}
