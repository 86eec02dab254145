//! Telemetry utilities for action timing and span construction.

use std::time::Instant;
use ticket_proto::ActionId;

/// Guard for timing an action inside its ticket actor.
///
/// Records latency when dropped.
pub struct ActionTimer {
    action: ActionId,
    start: Instant,
}

impl ActionTimer {
    pub fn new(action: ActionId) -> Self {
        Self {
            action,
            start: Instant::now(),
        }
    }
}

impl Drop for ActionTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_action(self.action.as_str(), duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use std::net::SocketAddr;
    use ticket_proto::TicketId;
    use tracing::{Span, info_span};

    /// Span for a ticket actor.
    pub fn ticket(id: &TicketId, seq: u64) -> Span {
        info_span!("ticket", ticket = %id, seq)
    }

    /// Span for a ticket's effect worker.
    pub fn effects(id: &TicketId) -> Span {
        info_span!("effects", ticket = %id)
    }

    /// Span for a bridge connection.
    pub fn bridge(peer: SocketAddr) -> Span {
        info_span!("bridge", %peer)
    }
}
