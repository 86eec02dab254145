//! Connection - Serves one bridge adapter.
//!
//! ```text
//!   socket ──▶ reader loop ──▶ task per event ──▶ Router
//!                  │                                 │
//!                  └─ call_result ─▶ BridgePlatform  │ Outcome
//!                                          │         ▼
//!   socket ◀── writer task ◀──── outbound queue ◀────┘
//! ```
//!
//! Events are handled concurrently; each reply carries the event's `seq`
//! so the adapter can match them up in any order. A line that does not
//! decode is skipped and, when its `seq` is readable, answered as ignored.

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use ticket_proto::{BridgeFrame, CoreCodec, CoreFrame, Outcome, ProtocolError};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{Instrument, debug, info, warn};

use super::bridge::{Attachment, BridgePlatform};
use crate::handlers::Router;

/// Frames buffered for the writer before producers wait.
const OUTBOUND_QUEUE: usize = 256;

pub struct Connection {
    peer: SocketAddr,
    stream: TcpStream,
    router: Arc<Router>,
    bridge: Arc<BridgePlatform>,
}

impl Connection {
    pub fn new(
        peer: SocketAddr,
        stream: TcpStream,
        router: Arc<Router>,
        bridge: Arc<BridgePlatform>,
    ) -> Self {
        Self {
            peer,
            stream,
            router,
            bridge,
        }
    }

    /// Run until the adapter disconnects or is replaced.
    pub async fn run(self) -> Result<(), ProtocolError> {
        let (sink, mut frames) = Framed::new(self.stream, CoreCodec::new()).split();
        let (out_tx, out_rx) = mpsc::channel::<CoreFrame>(OUTBOUND_QUEUE);

        let Attachment { link, mut evicted } = self.bridge.attach(out_tx.clone());
        info!(peer = %self.peer, link, "Bridge attached");

        let writer = tokio::spawn(write_loop(sink, out_rx).in_current_span());

        let result = loop {
            tokio::select! {
                _ = &mut evicted => {
                    info!(link, "Evicted by a newer bridge connection");
                    break Ok(());
                }
                frame = frames.next() => match frame {
                    Some(Ok(Ok(BridgeFrame::Event { seq, event }))) => {
                        debug!(seq, event = event.kind(), "Event received");
                        let router = Arc::clone(&self.router);
                        let out_tx = out_tx.clone();
                        tokio::spawn(
                            async move {
                                let outcome = router.dispatch(event).await;
                                let _ = out_tx.send(CoreFrame::Outcome { seq, outcome }).await;
                            }
                            .in_current_span(),
                        );
                    }
                    Some(Ok(Ok(BridgeFrame::CallResult { call_id, result }))) => {
                        self.bridge.resolve(call_id, result);
                    }
                    Some(Ok(Err(malformed))) => {
                        warn!(
                            link,
                            seq = ?malformed.seq,
                            error = %malformed.source,
                            "Skipping undecodable frame"
                        );
                        crate::metrics::record_bridge_event("undecodable");
                        if let Some(seq) = malformed.seq {
                            let outcome = Outcome::ignored();
                            let _ = out_tx.send(CoreFrame::Outcome { seq, outcome }).await;
                        }
                    }
                    Some(Err(e)) => break Err(e),
                    None => break Ok(()),
                },
            }
        };

        self.bridge.detach(link);
        writer.abort();
        if let Err(e) = &result {
            warn!(link, error = %e, "Bridge connection failed");
        }
        result
    }
}

async fn write_loop(
    mut sink: futures_util::stream::SplitSink<Framed<TcpStream, CoreCodec>, CoreFrame>,
    mut rx: mpsc::Receiver<CoreFrame>,
) {
    while let Some(frame) = rx.recv().await {
        if let Err(e) = sink.send(frame).await {
            warn!(error = %e, "Bridge write failed");
            break;
        }
    }
}
