//! The platform seam backed by a connected bridge adapter.
//!
//! Outbound calls are written to whichever connection is current and
//! correlated with their `call_result` by `call_id`. Only one adapter is
//! active at a time; attaching a new one evicts the old.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use ticket_proto::{CallResult, CoreFrame, OutboundCall};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::PlatformError;
use crate::services::{CallReply, Platform};

/// Handle to the connection currently serving calls.
struct Link {
    id: u64,
    outbound: mpsc::Sender<CoreFrame>,
    /// Dropped on eviction, which wakes the connection's `evicted` receiver.
    _evict: oneshot::Sender<()>,
}

/// A call waiting for its result, tagged with the link it was sent on.
struct PendingCall {
    link: u64,
    reply: oneshot::Sender<CallResult>,
}

/// What a connection gets back from [`BridgePlatform::attach`].
pub struct Attachment {
    pub link: u64,
    /// Resolves once a newer connection has taken over.
    pub evicted: oneshot::Receiver<()>,
}

pub struct BridgePlatform {
    current: Mutex<Option<Link>>,
    pending: DashMap<u64, PendingCall>,
    next_call: AtomicU64,
    next_link: AtomicU64,
    timeout: Duration,
}

impl BridgePlatform {
    pub fn new(timeout: Duration) -> Self {
        Self {
            current: Mutex::new(None),
            pending: DashMap::new(),
            next_call: AtomicU64::new(1),
            next_link: AtomicU64::new(1),
            timeout,
        }
    }

    /// Make `outbound` the connection that receives calls.
    pub fn attach(&self, outbound: mpsc::Sender<CoreFrame>) -> Attachment {
        let id = self.next_link.fetch_add(1, Ordering::Relaxed);
        let (evict_tx, evict_rx) = oneshot::channel();
        let previous = self.current.lock().replace(Link {
            id,
            outbound,
            _evict: evict_tx,
        });

        if let Some(old) = previous {
            info!(old = old.id, new = id, "Bridge connection replaced");
            self.fail_pending(old.id);
        }
        crate::metrics::set_bridge_connected(true);

        Attachment {
            link: id,
            evicted: evict_rx,
        }
    }

    /// Forget `link` if it is still current. Calls in flight on it fail.
    pub fn detach(&self, link: u64) {
        {
            let mut current = self.current.lock();
            if current.as_ref().is_some_and(|l| l.id == link) {
                *current = None;
                crate::metrics::set_bridge_connected(false);
            }
        }
        self.fail_pending(link);
    }

    pub fn is_connected(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Deliver a `call_result` to the waiting call.
    pub fn resolve(&self, call_id: u64, result: CallResult) {
        match self.pending.remove(&call_id) {
            Some((_, pending)) => {
                let _ = pending.reply.send(result);
            }
            None => debug!(call_id, "Result for unknown or expired call"),
        }
    }

    fn fail_pending(&self, link: u64) {
        // Dropping the reply senders wakes each waiter with Disconnected.
        self.pending.retain(|_, pending| pending.link != link);
    }

    fn current_link(&self) -> Option<(u64, mpsc::Sender<CoreFrame>)> {
        self.current
            .lock()
            .as_ref()
            .map(|l| (l.id, l.outbound.clone()))
    }
}

#[async_trait]
impl Platform for BridgePlatform {
    async fn execute(&self, call: OutboundCall) -> Result<CallReply, PlatformError> {
        let (link, outbound) = self.current_link().ok_or(PlatformError::Disconnected)?;

        let call_id = self.next_call.fetch_add(1, Ordering::Relaxed);
        let (reply_tx, reply_rx) = oneshot::channel();
        self.pending.insert(
            call_id,
            PendingCall {
                link,
                reply: reply_tx,
            },
        );

        if outbound.send(CoreFrame::Call { call_id, call }).await.is_err() {
            self.pending.remove(&call_id);
            return Err(PlatformError::Disconnected);
        }

        match tokio::time::timeout(self.timeout, reply_rx).await {
            Ok(Ok(CallResult::Ok { message })) => Ok(CallReply { message }),
            Ok(Ok(CallResult::Failed { reason })) => Err(PlatformError::Rejected(reason)),
            Ok(Err(_)) => Err(PlatformError::Disconnected),
            Err(_) => {
                self.pending.remove(&call_id);
                warn!(call_id, timeout = ?self.timeout, "Bridge call timed out");
                Err(PlatformError::Timeout)
            }
        }
    }
}
